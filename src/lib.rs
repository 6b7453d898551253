//! Benchmarking harness for single-object visual trackers.
//!
//! Several interchangeable tracking algorithms run side by side over labeled
//! sequences. Each frame, every tracker's box is judged valid or not against the
//! ground truth, drifting trackers are recovered according to a
//! [`ReinitStrategy`], and per-frame outcomes are aggregated into comparable
//! summaries.
//!
//! ```rust,ignore
//! use tracker_bench_rs::{BenchmarkRunner, EvaluationConfig, ScoreRule, load_dataset_infos};
//!
//! let config = EvaluationConfig::from_file("config.yaml")?;
//! let mut runner = BenchmarkRunner::new(config)?.with_output_dir("runs/latest");
//! runner.comparator_mut().add_backend("CSRT", csrt, ScoreRule::FailureOnly);
//! runner.comparator_mut().add_backend("VIT", vit, ScoreRule::RecoverBelow(0.3));
//!
//! let datasets = load_dataset_infos("datasets/");
//! let report = runner.run(&datasets, |info| open_video(&info.media_path))?;
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod orchestrator;
pub mod tracker;

pub use config::{EvaluationConfig, ReinitStrategy, ResolvedConfig, ValidityThresholds};
pub use dataset::{Annotation, DatasetInfo, GroundTruth, load_dataset_infos, load_ground_truth};
pub use error::{Error, Result};
pub use evaluation::{
    FrameResult, OverallSummary, PerformanceEvaluator, SequenceTrackingSummary, ValidationStatus,
};
pub use orchestrator::{BenchmarkRunner, CancelToken, RunReport, StopReason, TrackerComparator};
pub use tracker::{
    Frame, FrameSource, Rect, ScoreRule, ScoredTracker, TrackerState, TrackingBackend,
    TrackingCapability,
};
