//! Per-frame validity classification, statistics and result export.

mod evaluator;
mod export;
mod frame_result;
mod stats;
mod summary;

pub use evaluator::PerformanceEvaluator;
pub use export::{create_run_directory, ensure_dir, results_file_name, write_frame_results, write_yaml};
pub use frame_result::{FrameResult, LOST_CENTER_ERROR, ValidationStatus};
pub use stats::{mean, sample_std_dev};
pub use summary::{AveragedSummary, OverallSummary, SequenceSummaries, SequenceTrackingSummary};
