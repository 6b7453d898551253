//! Per-sequence and cross-sequence summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evaluation::stats;

/// Aggregate statistics of one tracker over one sequence.
///
/// Averages and deviations cover valid frames only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceTrackingSummary {
    pub average_overlap: f64,
    pub average_error: f64,
    pub average_processing_time: f64,
    pub valid_frame_percent: f64,
    pub overlap_std_dev: f64,
    pub error_std_dev: f64,
    pub processing_time_std_dev: f64,
    pub reinit_count: u32,
    pub frame_count: usize,
}

impl SequenceTrackingSummary {
    const COLUMNS: usize = 8;

    fn to_row(self) -> Vec<f64> {
        vec![
            self.average_overlap,
            self.average_error,
            self.average_processing_time,
            self.valid_frame_percent,
            self.overlap_std_dev,
            self.error_std_dev,
            self.processing_time_std_dev,
            self.reinit_count as f64,
        ]
    }
}

/// Summaries of every tracker for one sequence, keyed by tracker name.
pub type SequenceSummaries = BTreeMap<String, SequenceTrackingSummary>;

/// Mean of each summary field over the sequences a tracker ran on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragedSummary {
    pub average_overlap: f64,
    pub average_error: f64,
    pub average_processing_time: f64,
    pub valid_frame_percent: f64,
    pub overlap_std_dev: f64,
    pub error_std_dev: f64,
    pub processing_time_std_dev: f64,
    pub reinit_count: f64,
    pub sequences: usize,
}

/// Run-level table: tracker name to its averaged summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverallSummary {
    pub trackers: BTreeMap<String, AveragedSummary>,
}

impl OverallSummary {
    /// Average per-sequence summaries tracker by tracker.
    ///
    /// The result does not depend on the order of `sequences`.
    pub fn from_sequences<'a>(sequences: impl IntoIterator<Item = &'a SequenceSummaries>) -> Self {
        let mut rows: BTreeMap<&str, Vec<Vec<f64>>> = BTreeMap::new();
        for sequence in sequences {
            for (name, summary) in sequence {
                rows.entry(name.as_str()).or_default().push(summary.to_row());
            }
        }

        let trackers = rows
            .into_iter()
            .map(|(name, rows)| {
                let m = stats::column_means(&rows, SequenceTrackingSummary::COLUMNS);
                let averaged = AveragedSummary {
                    average_overlap: m[0],
                    average_error: m[1],
                    average_processing_time: m[2],
                    valid_frame_percent: m[3],
                    overlap_std_dev: m[4],
                    error_std_dev: m[5],
                    processing_time_std_dev: m[6],
                    reinit_count: m[7],
                    sequences: rows.len(),
                };
                (name.to_string(), averaged)
            })
            .collect();

        Self { trackers }
    }

    pub fn get(&self, tracker_name: &str) -> Option<&AveragedSummary> {
        self.trackers.get(tracker_name)
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn summary(overlap: f64, reinits: u32) -> SequenceTrackingSummary {
        SequenceTrackingSummary {
            average_overlap: overlap,
            reinit_count: reinits,
            valid_frame_percent: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_overall_summary_is_order_independent() {
        let a: SequenceSummaries = [
            ("CSRT".to_string(), summary(0.8, 1)),
            ("VIT".to_string(), summary(0.6, 0)),
        ]
        .into_iter()
        .collect();
        let b: SequenceSummaries = [("CSRT".to_string(), summary(0.4, 3))].into_iter().collect();

        let forward = OverallSummary::from_sequences([&a, &b]);
        let backward = OverallSummary::from_sequences([&b, &a]);
        assert_eq!(forward, backward);

        let csrt = forward.get("CSRT").unwrap();
        assert_relative_eq!(csrt.average_overlap, 0.6, epsilon = 1e-12);
        assert_relative_eq!(csrt.reinit_count, 2.0);
        assert_eq!(csrt.sequences, 2);

        let vit = forward.get("VIT").unwrap();
        assert_relative_eq!(vit.average_overlap, 0.6);
        assert_eq!(vit.sequences, 1);
    }

    #[test]
    fn test_empty_overall_summary() {
        let overall = OverallSummary::from_sequences(std::iter::empty::<&SequenceSummaries>());
        assert!(overall.is_empty());
    }

    #[test]
    fn test_summary_yaml_keys() {
        let yaml = serde_yaml::to_string(&summary(0.5, 2)).unwrap();
        assert!(yaml.contains("average_overlap: 0.5"));
        assert!(yaml.contains("reinit_count: 2"));
        assert!(yaml.contains("valid_frame_percent: 1.0"));
    }
}
