//! Single-sequence evaluation loop.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::{ReinitStrategy, ResolvedConfig};
use crate::dataset::{Annotation, GroundTruth};
use crate::error::{Error, ExportError, Result};
use crate::evaluation::{
    self, PerformanceEvaluator, SequenceSummaries, ValidationStatus, results_file_name,
};
use crate::orchestrator::reinit_policy::{self, ReinitAction, ReinitContext};
use crate::tracker::{
    Frame, FrameSource, Rect, ScoreRule, ScoredTracker, TrackerState, TrackingBackend,
    TrackingCapability,
};

/// Boxed tracker as held by the comparator.
pub type BoxedTracker = Box<dyn TrackingCapability + Send>;

/// Shared flag for aborting a run between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of the comparator over one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No sequence initialized
    Idle,
    /// First frame consumed, trackers initialized at ground truth
    Initialized,
    Running,
    Finished,
}

/// Why a sequence's frame loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    SourceExhausted,
    GroundTruthExhausted,
    FrameReadFailed(String),
    Cancelled,
}

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStep {
    /// Status per tracker in registration order; `None` when the frame has no annotation
    Evaluated(Vec<Option<ValidationStatus>>),
    /// The frame index is past the end of the ground truth
    GroundTruthExhausted,
}

struct TrackerSlot {
    tracker: BoxedTracker,
    evaluator: PerformanceEvaluator,
    last_box: Rect,
    consecutive_invalid: u32,
}

impl TrackerSlot {
    fn reset(&mut self) {
        self.evaluator.reset();
        self.last_box = Rect::default();
        self.consecutive_invalid = 0;
        self.tracker.set_state(TrackerState::Ready);
    }

    /// Update, classify and apply the recovery policy for one frame.
    fn step(
        &mut self,
        frame: &Frame,
        frame_index: usize,
        annotation: Option<&Annotation>,
        strategy: Option<ReinitStrategy>,
    ) -> Option<ValidationStatus> {
        let mut processing_time = 0.0;
        if !self.tracker.state().is_frozen() {
            let mut roi = self.last_box;
            let started = Instant::now();
            self.tracker.update(frame, &mut roi);
            processing_time = started.elapsed().as_secs_f64();
            self.last_box = roi;
        }

        let annotation = annotation?;
        let tracker_lost = self.tracker.state() == TrackerState::Lost;
        let status = self.evaluator.validate_and_add_result(
            frame_index,
            &annotation.rect,
            &self.last_box,
            processing_time,
            tracker_lost,
        );

        if status.is_valid() {
            self.consecutive_invalid = 0;
            return Some(status);
        }
        self.consecutive_invalid += 1;
        if tracker_lost {
            return Some(status);
        }

        let ctx = ReinitContext {
            status,
            occluded: annotation.is_occluded(),
            consecutive_invalid: self.consecutive_invalid,
        };
        match reinit_policy::decide(strategy, ctx) {
            ReinitAction::Keep => {}
            ReinitAction::Reinit => {
                log::debug!(
                    "reinit {} at frame {} after {:?}",
                    self.tracker.name(),
                    frame_index,
                    status
                );
                self.tracker.init(frame, annotation.rect);
                self.last_box = annotation.rect;
                self.evaluator.tracking_reinited();
                self.consecutive_invalid = 0;
            }
            ReinitAction::Disable => {
                self.tracker.set_state(TrackerState::ToBeReinited);
            }
        }
        Some(status)
    }
}

/// Drives N trackers over one shared sequence and its ground truth.
pub struct TrackerComparator {
    config: ResolvedConfig,
    slots: Vec<TrackerSlot>,
    ground_truth: GroundTruth,
    frame_index: usize,
    phase: Phase,
}

impl TrackerComparator {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            ground_truth: GroundTruth::default(),
            frame_index: 0,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Register a tracker. Trackers are processed in registration order.
    pub fn add_tracker<T: TrackingCapability + Send + 'static>(&mut self, tracker: T) {
        self.add_boxed_tracker(Box::new(tracker));
    }

    pub fn add_boxed_tracker(&mut self, tracker: BoxedTracker) {
        let evaluator = PerformanceEvaluator::new(tracker.name(), self.config.thresholds);
        self.slots.push(TrackerSlot {
            tracker,
            evaluator,
            last_box: Rect::default(),
            consecutive_invalid: 0,
        });
    }

    /// Wrap a backend in a [`ScoredTracker`], applying any configured score threshold.
    pub fn add_backend<B>(&mut self, name: &str, backend: B, rule: ScoreRule)
    where
        B: TrackingBackend + Send + 'static,
    {
        let mut tracker = ScoredTracker::new(name, backend, rule);
        if let Some(threshold) = self.config.score_threshold(name) {
            tracker.set_score_threshold(threshold);
        }
        self.add_tracker(tracker);
    }

    pub fn tracker_count(&self) -> usize {
        self.slots.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next frame to be processed.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    pub fn tracker_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.tracker.name()).collect()
    }

    pub fn tracker_states(&self) -> Vec<TrackerState> {
        self.slots.iter().map(|s| s.tracker.state()).collect()
    }

    pub fn evaluators(&self) -> impl Iterator<Item = &PerformanceEvaluator> {
        self.slots.iter().map(|s| &s.evaluator)
    }

    pub fn evaluator(&self, tracker_name: &str) -> Option<&PerformanceEvaluator> {
        self.evaluators().find(|e| e.tracker_name() == tracker_name)
    }

    /// Last box of each tracker, in registration order.
    pub fn last_boxes(&self) -> Vec<Rect> {
        self.slots.iter().map(|s| s.last_box).collect()
    }

    /// Set the ground truth of the next sequence.
    pub fn load_sequence(&mut self, ground_truth: GroundTruth) {
        if self.phase != Phase::Idle {
            log::warn!("loading a sequence without reset, clearing previous state");
            self.reset();
        }
        self.ground_truth = ground_truth;
    }

    /// Consume the first frame and initialize every tracker at its ground truth.
    ///
    /// Normalized ground truth is converted to pixels using this frame's size.
    pub fn initialize(&mut self, first_frame: &Frame) -> Result<()> {
        if self.slots.is_empty() {
            return Err(Error::NoTrackers);
        }
        self.ground_truth = self
            .ground_truth
            .to_pixels(first_frame.width, first_frame.height);
        let initial = self
            .ground_truth
            .get(0)
            .map(|a| a.rect)
            .ok_or(Error::NoInitialAnnotation)?;

        for slot in &mut self.slots {
            slot.tracker.init(first_frame, initial);
            slot.last_box = initial;
            slot.consecutive_invalid = 0;
        }
        self.frame_index = 1;
        self.phase = Phase::Initialized;
        log::info!(
            "initialized {} trackers on {} ground truth frames",
            self.slots.len(),
            self.ground_truth.len()
        );
        Ok(())
    }

    /// Run every tracker on `frame` against the current ground-truth index.
    ///
    /// All trackers see the same frame and annotation before the index advances.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameStep> {
        match self.phase {
            Phase::Idle => return Err(Error::NotInitialized),
            Phase::Finished => return Ok(FrameStep::GroundTruthExhausted),
            Phase::Initialized | Phase::Running => {}
        }
        if !self.ground_truth.covers(self.frame_index) {
            log::error!(
                "ground truth exhausted at frame {} ({} annotations), stopping sequence",
                self.frame_index,
                self.ground_truth.len()
            );
            self.phase = Phase::Finished;
            return Ok(FrameStep::GroundTruthExhausted);
        }
        self.phase = Phase::Running;

        let frame_index = self.frame_index;
        let annotation = self.ground_truth.get(frame_index);
        if annotation.is_none() {
            log::trace!("frame {} has no annotation", frame_index);
        }
        let strategy = self.config.strategy;

        let statuses: Vec<Option<ValidationStatus>> = if self.config.parallel {
            self.slots
                .par_iter_mut()
                .map(|slot| slot.step(frame, frame_index, annotation, strategy))
                .collect()
        } else {
            self.slots
                .iter_mut()
                .map(|slot| slot.step(frame, frame_index, annotation, strategy))
                .collect()
        };

        self.frame_index += 1;
        Ok(FrameStep::Evaluated(statuses))
    }

    /// Evaluate the loaded sequence until the source or the ground truth ends.
    pub fn run<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        cancel: &CancelToken,
    ) -> Result<StopReason> {
        if self.phase == Phase::Idle {
            let first = source.next_frame()?.ok_or(Error::NoFirstFrame)?;
            self.initialize(&first)?;
        }

        let reason = loop {
            if cancel.is_cancelled() {
                log::warn!("evaluation cancelled at frame {}", self.frame_index);
                break StopReason::Cancelled;
            }
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::SourceExhausted,
                Err(e) => {
                    log::warn!("{}, stopping sequence at frame {}", e, self.frame_index);
                    break StopReason::FrameReadFailed(e.0);
                }
            };

            let started = Instant::now();
            if self.process_frame(&frame)? == FrameStep::GroundTruthExhausted {
                break StopReason::GroundTruthExhausted;
            }
            if let Some(interval) = self.config.frame_interval {
                let spent = started.elapsed();
                if spent < interval {
                    thread::sleep(interval - spent);
                }
            }
        };

        self.phase = Phase::Finished;
        log::info!("sequence finished after {} frames: {:?}", self.frame_index, reason);
        Ok(reason)
    }

    /// Summaries of every tracker, keyed by name.
    pub fn summaries(&self) -> SequenceSummaries {
        self.slots
            .iter()
            .map(|s| (s.tracker.name().to_string(), s.evaluator.summary()))
            .collect()
    }

    /// Write every tracker's per-frame table and `summary.yaml` into `dir`.
    ///
    /// Failures are logged and returned; they never stop the caller.
    pub fn save_results<P: AsRef<Path>>(&self, dir: P) -> Vec<ExportError> {
        let dir = dir.as_ref();
        let mut failures = Vec::new();
        if let Err(e) = evaluation::ensure_dir(dir) {
            log::error!("{}", e);
            failures.push(e);
            return failures;
        }

        for slot in &self.slots {
            let path = dir.join(results_file_name(slot.tracker.name()));
            if let Err(e) = evaluation::write_frame_results(&path, slot.evaluator.results()) {
                log::error!("{}", e);
                failures.push(e);
            }
        }
        if let Err(e) = evaluation::write_yaml(dir.join("summary.yaml"), &self.summaries()) {
            log::error!("{}", e);
            failures.push(e);
        }
        log::info!("results saved to {}", dir.display());
        failures
    }

    /// Clear all per-sequence state; trackers and configuration are kept.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
        self.ground_truth = GroundTruth::default();
        self.frame_index = 0;
        self.phase = Phase::Idle;
    }
}
