#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracker_bench_rs::tracker::StateCell;
use tracker_bench_rs::{Frame, Rect, TrackerState, TrackingCapability};

type Script = Box<dyn Fn(usize) -> Rect + Send>;

/// Tracker whose prediction is a function of how many updates it has seen.
pub struct ScriptedTracker {
    name: String,
    script: Script,
    lose_at: Option<usize>,
    state: StateCell,
    pub updates: Arc<AtomicUsize>,
    pub inits: Arc<AtomicUsize>,
}

impl ScriptedTracker {
    pub fn new(name: &str, script: impl Fn(usize) -> Rect + Send + 'static) -> Self {
        Self {
            name: name.to_string(),
            script: Box::new(script),
            lose_at: None,
            state: StateCell::new(),
            updates: Arc::new(AtomicUsize::new(0)),
            inits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always predicts `rect`.
    pub fn fixed(name: &str, rect: Rect) -> Self {
        Self::new(name, move |_| rect)
    }

    /// Report `Lost` from the given update number (1-based) on.
    pub fn lose_at(mut self, update: usize) -> Self {
        self.lose_at = Some(update);
        self
    }

    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (self.updates.clone(), self.inits.clone())
    }
}

impl TrackingCapability for ScriptedTracker {
    fn init(&mut self, _frame: &Frame, _roi: Rect) {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.state.set(TrackerState::Tracking);
    }

    fn update(&mut self, _frame: &Frame, roi: &mut Rect) -> bool {
        let n = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        *roi = (self.script)(n);
        if self.lose_at.is_some_and(|at| n >= at) {
            self.state.set(TrackerState::Lost);
            return false;
        }
        true
    }

    fn state(&self) -> TrackerState {
        self.state.get()
    }

    fn set_state(&mut self, state: TrackerState) {
        self.state.set(state);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn target() -> Rect {
    Rect::new(10.0, 10.0, 20.0, 20.0)
}

pub fn far_away() -> Rect {
    Rect::new(200.0, 200.0, 20.0, 20.0)
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
