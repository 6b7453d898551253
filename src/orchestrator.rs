//! Evaluation orchestration: the per-frame loop, recovery policy and
//! multi-sequence runs.

mod comparator;
mod reinit_policy;
mod runner;

pub use comparator::{BoxedTracker, CancelToken, FrameStep, Phase, StopReason, TrackerComparator};
pub use reinit_policy::{ReinitAction, ReinitContext, decide};
pub use runner::{BenchmarkRunner, RunReport, SequenceReport};
