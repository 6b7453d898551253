use std::fmt;

/// Tracker state enumeration for the single-object tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackerState {
    /// Created, not yet initialized
    #[default]
    Ready,
    /// Ran and reports confidence above its threshold
    Tracking,
    /// Ran but reports low confidence
    Recovering,
    /// Reports total failure
    Lost,
    /// Disabled by policy until re-initialized externally
    ToBeReinited,
}

impl TrackerState {
    /// Frozen trackers are not updated; their last box is reused.
    #[inline]
    pub fn is_frozen(self) -> bool {
        matches!(self, TrackerState::Lost | TrackerState::ToBeReinited)
    }
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackerState::Ready => "Ready",
            TrackerState::Tracking => "Tracking",
            TrackerState::Recovering => "Recovering",
            TrackerState::Lost => "Lost",
            TrackerState::ToBeReinited => "ToBeReinited",
        };
        f.write_str(name)
    }
}

/// A recorded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: TrackerState,
    pub to: TrackerState,
}

/// Holds a tracker's current state and the log of every real transition.
///
/// Setting the state it already holds is a no-op and is not logged.
#[derive(Debug, Clone, Default)]
pub struct StateCell {
    current: TrackerState,
    transitions: Vec<StateTransition>,
}

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> TrackerState {
        self.current
    }

    /// Returns `true` when the state actually changed.
    pub fn set(&mut self, state: TrackerState) -> bool {
        if self.current == state {
            return false;
        }
        log::debug!("tracker state {} -> {}", self.current, state);
        self.transitions.push(StateTransition {
            from: self.current,
            to: state,
        });
        self.current = state;
        true
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }
}
