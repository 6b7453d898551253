//! Tracking capability contract and the score-gated backend adapter.

use crate::tracker::frame::Frame;
use crate::tracker::rect::Rect;
use crate::tracker::tracker_state::{StateCell, TrackerState};

/// Score reported by capabilities without a confidence measure.
pub const NO_SCORE: f64 = -1.0;

/// Single-object tracking algorithm as seen by the evaluation loop.
///
/// The comparator depends only on this trait, never on concrete algorithms.
pub trait TrackingCapability {
    /// Start tracking `roi` on `frame`.
    fn init(&mut self, frame: &Frame, roi: Rect);

    /// Track into `frame`, writing the predicted box into `roi`.
    fn update(&mut self, frame: &Frame, roi: &mut Rect) -> bool;

    fn state(&self) -> TrackerState;

    /// Override the state from outside. Setting the current state is a no-op.
    fn set_state(&mut self, state: TrackerState);

    /// Capability-specific confidence, or [`NO_SCORE`].
    fn score(&self) -> f64 {
        NO_SCORE
    }

    fn name(&self) -> &str;
}

impl<T: TrackingCapability + ?Sized> TrackingCapability for Box<T> {
    fn init(&mut self, frame: &Frame, roi: Rect) {
        (**self).init(frame, roi)
    }

    fn update(&mut self, frame: &Frame, roi: &mut Rect) -> bool {
        (**self).update(frame, roi)
    }

    fn state(&self) -> TrackerState {
        (**self).state()
    }

    fn set_state(&mut self, state: TrackerState) {
        (**self).set_state(state)
    }

    fn score(&self) -> f64 {
        (**self).score()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Trait for raw tracking algorithm backends.
///
/// Implement this trait to plug a correlation-filter, transformer or Siamese
/// tracker into the harness through [`ScoredTracker`].
pub trait TrackingBackend {
    /// Error type for backend failures.
    type Error: std::fmt::Display;

    fn init(&mut self, frame: &Frame, roi: Rect) -> Result<(), Self::Error>;

    /// Returns whether the backend considers the update successful.
    fn update(&mut self, frame: &Frame, roi: &mut Rect) -> Result<bool, Self::Error>;

    /// Confidence of the latest update, if the backend has one.
    fn score(&self) -> Option<f64> {
        None
    }
}

/// How a backend's result and score map onto [`TrackerState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreRule {
    /// Unsuccessful update means `Lost`.
    FailureOnly,
    /// Score below the threshold means `Lost`.
    LostBelow(f64),
    /// Score below the threshold means `Recovering`, otherwise `Tracking`.
    RecoverBelow(f64),
}

impl ScoreRule {
    /// Same rule with a different threshold. `FailureOnly` has none to replace.
    pub fn with_threshold(self, threshold: f64) -> Self {
        match self {
            ScoreRule::FailureOnly => ScoreRule::FailureOnly,
            ScoreRule::LostBelow(_) => ScoreRule::LostBelow(threshold),
            ScoreRule::RecoverBelow(_) => ScoreRule::RecoverBelow(threshold),
        }
    }

    /// State after an update. `None` leaves the state untouched.
    pub fn classify(self, ok: bool, score: Option<f64>) -> Option<TrackerState> {
        match self {
            ScoreRule::FailureOnly => (!ok).then_some(TrackerState::Lost),
            ScoreRule::LostBelow(thresh) => {
                let score = score.unwrap_or(NO_SCORE);
                (score < thresh).then_some(TrackerState::Lost)
            }
            ScoreRule::RecoverBelow(thresh) => {
                let score = score.unwrap_or(NO_SCORE);
                Some(if score >= thresh {
                    TrackerState::Tracking
                } else {
                    TrackerState::Recovering
                })
            }
        }
    }
}

/// Adapts a [`TrackingBackend`] into a [`TrackingCapability`].
pub struct ScoredTracker<B: TrackingBackend> {
    name: String,
    backend: B,
    rule: ScoreRule,
    state: StateCell,
}

impl<B: TrackingBackend> ScoredTracker<B> {
    pub fn new(name: impl Into<String>, backend: B, rule: ScoreRule) -> Self {
        Self {
            name: name.into(),
            backend,
            rule,
            state: StateCell::new(),
        }
    }

    pub fn rule(&self) -> ScoreRule {
        self.rule
    }

    /// Replace the score threshold, e.g. from per-tracker configuration.
    pub fn set_score_threshold(&mut self, threshold: f64) {
        self.rule = self.rule.with_threshold(threshold);
    }

    /// Every state transition since creation.
    pub fn state_log(&self) -> &StateCell {
        &self.state
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a mutable reference to the underlying backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: TrackingBackend> TrackingCapability for ScoredTracker<B> {
    fn init(&mut self, frame: &Frame, roi: Rect) {
        match self.backend.init(frame, roi) {
            Ok(()) => {
                self.state.set(TrackerState::Tracking);
            }
            Err(e) => {
                log::warn!("{}: init failed: {}", self.name, e);
                self.state.set(TrackerState::Lost);
            }
        }
    }

    fn update(&mut self, frame: &Frame, roi: &mut Rect) -> bool {
        match self.backend.update(frame, roi) {
            Ok(ok) => {
                if let Some(state) = self.rule.classify(ok, self.backend.score()) {
                    self.state.set(state);
                }
                ok
            }
            Err(e) => {
                log::warn!("{}: update failed: {}", self.name, e);
                self.state.set(TrackerState::Lost);
                false
            }
        }
    }

    fn state(&self) -> TrackerState {
        self.state.get()
    }

    fn set_state(&mut self, state: TrackerState) {
        self.state.set(state);
    }

    fn score(&self) -> f64 {
        self.backend.score().unwrap_or(NO_SCORE)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
