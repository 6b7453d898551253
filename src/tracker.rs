mod capability;
mod frame;
mod rect;
mod tracker_state;

pub use capability::{NO_SCORE, ScoreRule, ScoredTracker, TrackingBackend, TrackingCapability};
pub use frame::{Frame, FrameSource, InMemoryFrames};
pub use rect::Rect;
pub use tracker_state::{StateCell, StateTransition, TrackerState};
