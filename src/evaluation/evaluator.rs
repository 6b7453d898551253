//! Per-tracker validity classification and statistics.

use crate::config::ValidityThresholds;
use crate::evaluation::frame_result::{FrameResult, LOST_CENTER_ERROR, ValidationStatus};
use crate::evaluation::stats;
use crate::evaluation::summary::SequenceTrackingSummary;
use crate::tracker::Rect;

/// Judges one tracker's frames against the ground truth and accumulates results.
#[derive(Debug, Clone)]
pub struct PerformanceEvaluator {
    tracker_name: String,
    thresholds: ValidityThresholds,
    results: Vec<FrameResult>,
    reinit_count: u32,
}

impl PerformanceEvaluator {
    pub fn new(tracker_name: impl Into<String>, thresholds: ValidityThresholds) -> Self {
        Self {
            tracker_name: tracker_name.into(),
            thresholds,
            results: Vec::new(),
            reinit_count: 0,
        }
    }

    pub fn tracker_name(&self) -> &str {
        &self.tracker_name
    }

    pub fn thresholds(&self) -> ValidityThresholds {
        self.thresholds
    }

    /// Classify one frame and record its result.
    ///
    /// A tracker reporting itself lost is `NonValidTrackerLost` without any
    /// geometry being computed. Otherwise the overlap check runs first and the
    /// center-error check may override its verdict.
    pub fn validate_and_add_result(
        &mut self,
        frame_index: usize,
        ground_truth: &Rect,
        prediction: &Rect,
        processing_time: f64,
        tracker_reports_lost: bool,
    ) -> ValidationStatus {
        if tracker_reports_lost {
            self.results.push(FrameResult {
                frame_index,
                overlap: 0.0,
                center_error: LOST_CENTER_ERROR,
                processing_time,
                bbox_area: prediction.area(),
                valid: false,
            });
            log::trace!(
                "{} frame {}: {:?}",
                self.tracker_name,
                frame_index,
                ValidationStatus::NonValidTrackerLost
            );
            return ValidationStatus::NonValidTrackerLost;
        }

        let overlap = ground_truth.iou(prediction);
        let center_error = ground_truth.center_distance(prediction);
        let normalized_center_error = normalize_center_error(center_error, ground_truth.diagonal());

        let mut status = ValidationStatus::Valid;
        if overlap < self.thresholds.overlap {
            status = ValidationStatus::NonValidOverlap;
        }
        if !normalized_center_error.is_finite()
            || normalized_center_error > self.thresholds.center_error
        {
            status = ValidationStatus::NonValidCenterError;
        }

        self.results.push(FrameResult {
            frame_index,
            overlap,
            center_error,
            processing_time,
            bbox_area: prediction.area(),
            valid: status.is_valid(),
        });
        log::trace!(
            "{} frame {}: overlap={:.3} error={:.2} {:?}",
            self.tracker_name,
            frame_index,
            overlap,
            center_error,
            status
        );
        status
    }

    /// Count one externally triggered reinitialization.
    pub fn tracking_reinited(&mut self) {
        log::debug!("tracker {} reinited", self.tracker_name);
        self.reinit_count += 1;
    }

    pub fn reinit_count(&self) -> u32 {
        self.reinit_count
    }

    pub fn results(&self) -> &[FrameResult] {
        &self.results
    }

    /// Drop all per-sequence state, keeping the name and thresholds.
    pub fn reset(&mut self) {
        self.results.clear();
        self.reinit_count = 0;
    }

    fn valid_values(&self, field: impl Fn(&FrameResult) -> f64) -> Vec<f64> {
        self.results
            .iter()
            .filter(|r| r.valid)
            .map(field)
            .collect()
    }

    pub fn average_overlap(&self) -> f64 {
        stats::mean(&self.valid_values(|r| r.overlap))
    }

    pub fn average_error(&self) -> f64 {
        stats::mean(&self.valid_values(|r| r.center_error))
    }

    pub fn average_processing_time(&self) -> f64 {
        stats::mean(&self.valid_values(|r| r.processing_time))
    }

    pub fn overlap_std_dev(&self) -> f64 {
        stats::sample_std_dev(&self.valid_values(|r| r.overlap))
    }

    pub fn error_std_dev(&self) -> f64 {
        stats::sample_std_dev(&self.valid_values(|r| r.center_error))
    }

    pub fn processing_time_std_dev(&self) -> f64 {
        stats::sample_std_dev(&self.valid_values(|r| r.processing_time))
    }

    /// Fraction of recorded frames that were valid, in `[0, 1]`.
    pub fn valid_frame_percent(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let valid = self.results.iter().filter(|r| r.valid).count();
        valid as f64 / self.results.len() as f64
    }

    pub fn summary(&self) -> SequenceTrackingSummary {
        SequenceTrackingSummary {
            average_overlap: self.average_overlap(),
            average_error: self.average_error(),
            average_processing_time: self.average_processing_time(),
            valid_frame_percent: self.valid_frame_percent(),
            overlap_std_dev: self.overlap_std_dev(),
            error_std_dev: self.error_std_dev(),
            processing_time_std_dev: self.processing_time_std_dev(),
            reinit_count: self.reinit_count,
            frame_count: self.results.len(),
        }
    }
}

/// Center error as a fraction of the ground-truth diagonal.
///
/// A degenerate ground truth makes any nonzero error infinitely large.
fn normalize_center_error(center_error: f64, diagonal: f64) -> f64 {
    if diagonal > 0.0 {
        center_error / diagonal
    } else if center_error > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
