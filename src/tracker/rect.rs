use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with evaluation geometry.
///
/// Supports two formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height (pixel ground truth, tracker output)
/// - normalized CXCYWH: Center X, Center Y, Width, Height as fractions of the frame size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f64,
    /// Top-left y coordinate
    pub y: f64,
    /// Width of the bounding box
    pub width: f64,
    /// Height of the bounding box
    pub height: f64,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a pixel Rect from a normalized center box and the frame size.
    pub fn from_normalized_center(
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let w = width * fw;
        let h = height * fh;
        Self {
            x: cx * fw - w / 2.0,
            y: cy * fh - h / 2.0,
            width: w,
            height: h,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f64; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box. Degenerate boxes have zero area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Length of the box diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        Vector2::new(self.width, self.height).norm()
    }

    /// Area shared by both boxes.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let [ax1, ay1, ax2, ay2] = self.to_tlbr();
        let [bx1, by1, bx2, by2] = other.to_tlbr();

        let inter_width = (ax2.min(bx2) - ax1.max(bx1)).max(0.0);
        let inter_height = (ay2.min(by2) - ay1.max(by1)).max(0.0);
        inter_width * inter_height
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Always within `[0, 1]`; a zero union yields 0.
    pub fn iou(&self, other: &Rect) -> f64 {
        let inter_area = self.intersection_area(other);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 && union_area.is_finite() {
            (inter_area / union_area).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Euclidean distance between the centers of two boxes.
    #[inline]
    pub fn center_distance(&self, other: &Rect) -> f64 {
        nalgebra::distance(&self.center(), &other.center())
    }
}
