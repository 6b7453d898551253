use crate::tracker::Rect;

/// Coordinate system of a ground-truth file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coordinates {
    /// Top-left boxes in pixels
    #[default]
    Pixels,
    /// Center boxes as fractions of the frame size
    Normalized,
}

/// Ground-truth box of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub rect: Rect,
    pub frame_index: usize,
    /// `None` when the source carries no occlusion information
    pub occluded: Option<bool>,
}

impl Annotation {
    pub fn new(frame_index: usize, rect: Rect) -> Self {
        Self {
            rect,
            frame_index,
            occluded: None,
        }
    }

    pub fn with_occlusion(mut self, occluded: bool) -> Self {
        self.occluded = Some(occluded);
        self
    }

    #[inline]
    pub fn is_occluded(&self) -> bool {
        self.occluded.unwrap_or(false)
    }
}

/// Ground truth of one sequence, indexed by frame.
///
/// A frame may be listed without an annotation; such frames are not scored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruth {
    entries: Vec<Option<Annotation>>,
    coordinates: Coordinates,
}

impl GroundTruth {
    pub fn new(entries: Vec<Option<Annotation>>, coordinates: Coordinates) -> Self {
        Self {
            entries,
            coordinates,
        }
    }

    /// Pixel ground truth with one box per frame.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let entries = rects
            .into_iter()
            .enumerate()
            .map(|(i, rect)| Some(Annotation::new(i, rect)))
            .collect();
        Self::new(entries, Coordinates::Pixels)
    }

    pub fn from_annotations(annotations: impl IntoIterator<Item = Annotation>) -> Self {
        let mut entries: Vec<Option<Annotation>> = Vec::new();
        for annotation in annotations {
            if annotation.frame_index >= entries.len() {
                entries.resize(annotation.frame_index + 1, None);
            }
            entries[annotation.frame_index] = Some(annotation);
        }
        Self::new(entries, Coordinates::Pixels)
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Number of frames covered, annotated or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `frame_index` is still inside the ground truth.
    #[inline]
    pub fn covers(&self, frame_index: usize) -> bool {
        frame_index < self.entries.len()
    }

    pub fn get(&self, frame_index: usize) -> Option<&Annotation> {
        self.entries.get(frame_index).and_then(Option::as_ref)
    }

    pub fn annotated_frames(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Convert normalized boxes into pixel boxes for a frame of the given size.
    ///
    /// Pixel ground truth is returned unchanged.
    pub fn to_pixels(&self, frame_width: u32, frame_height: u32) -> GroundTruth {
        if self.coordinates == Coordinates::Pixels {
            return self.clone();
        }
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                entry.map(|a| Annotation {
                    rect: Rect::from_normalized_center(
                        a.rect.x,
                        a.rect.y,
                        a.rect.width,
                        a.rect.height,
                        frame_width,
                        frame_height,
                    ),
                    ..a
                })
            })
            .collect();
        GroundTruth::new(entries, Coordinates::Pixels)
    }
}
