use serde::Serialize;

/// Center error recorded for frames where the tracker reported itself lost.
pub const LOST_CENTER_ERROR: f64 = -1.0;

/// Per-frame verdict of comparing a prediction with the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationStatus {
    Valid,
    /// The tracker itself reported total failure
    NonValidTrackerLost,
    /// IoU below the overlap threshold
    NonValidOverlap,
    /// Normalized center error above the center-error threshold
    NonValidCenterError,
}

impl ValidationStatus {
    #[inline]
    pub fn is_valid(self) -> bool {
        self == ValidationStatus::Valid
    }
}

/// Outcome of one tracker on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameResult {
    #[serde(rename = "frame")]
    pub frame_index: usize,
    /// IoU with the ground truth, in `[0, 1]`
    pub overlap: f64,
    /// Center distance in pixels
    pub center_error: f64,
    /// Seconds spent in the tracker's update
    pub processing_time: f64,
    /// Area of the predicted box in pixels
    pub bbox_area: f64,
    pub valid: bool,
}
