use crate::config::ReinitStrategy;
use crate::evaluation::ValidationStatus;

/// What the comparator should do with a tracker after an invalid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReinitAction {
    /// Leave the tracker alone this frame
    Keep,
    /// Re-initialize at the current ground truth and count a reinit
    Reinit,
    /// Freeze the tracker as `ToBeReinited` for the rest of the sequence
    Disable,
}

/// Inputs of one recovery decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReinitContext {
    pub status: ValidationStatus,
    /// Current frame's ground truth is marked occluded
    pub occluded: bool,
    /// Invalid frames in a row, including the current one
    pub consecutive_invalid: u32,
}

/// Stateless recovery policy.
///
/// `None` as strategy never reinitializes.
pub fn decide(strategy: Option<ReinitStrategy>, ctx: ReinitContext) -> ReinitAction {
    if ctx.status.is_valid() {
        return ReinitAction::Keep;
    }
    match strategy {
        None => ReinitAction::Keep,
        Some(ReinitStrategy::Immediate) if ctx.occluded => ReinitAction::Keep,
        Some(ReinitStrategy::Immediate) => ReinitAction::Reinit,
        Some(ReinitStrategy::OneInit) => ReinitAction::Disable,
        Some(ReinitStrategy::Delayed { delay_frames }) => {
            if !ctx.occluded && ctx.consecutive_invalid >= delay_frames {
                ReinitAction::Reinit
            } else {
                ReinitAction::Keep
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(status: ValidationStatus, occluded: bool, consecutive_invalid: u32) -> ReinitContext {
        ReinitContext {
            status,
            occluded,
            consecutive_invalid,
        }
    }

    #[test]
    fn test_valid_frames_never_act() {
        for strategy in [
            None,
            Some(ReinitStrategy::Immediate),
            Some(ReinitStrategy::OneInit),
            Some(ReinitStrategy::Delayed { delay_frames: 1 }),
        ] {
            assert_eq!(
                decide(strategy, ctx(ValidationStatus::Valid, false, 0)),
                ReinitAction::Keep
            );
        }
    }

    #[test]
    fn test_immediate_waits_for_unoccluded_frame() {
        let strategy = Some(ReinitStrategy::Immediate);
        assert_eq!(
            decide(strategy, ctx(ValidationStatus::NonValidOverlap, true, 1)),
            ReinitAction::Keep
        );
        assert_eq!(
            decide(strategy, ctx(ValidationStatus::NonValidOverlap, false, 2)),
            ReinitAction::Reinit
        );
    }

    #[test]
    fn test_one_init_disables() {
        assert_eq!(
            decide(
                Some(ReinitStrategy::OneInit),
                ctx(ValidationStatus::NonValidCenterError, true, 1)
            ),
            ReinitAction::Disable
        );
    }

    #[test]
    fn test_delayed_counts_consecutive_frames() {
        let strategy = Some(ReinitStrategy::Delayed { delay_frames: 3 });
        let status = ValidationStatus::NonValidOverlap;
        assert_eq!(decide(strategy, ctx(status, false, 2)), ReinitAction::Keep);
        assert_eq!(decide(strategy, ctx(status, false, 3)), ReinitAction::Reinit);
        assert_eq!(decide(strategy, ctx(status, true, 5)), ReinitAction::Keep);
    }

    #[test]
    fn test_no_strategy() {
        assert_eq!(
            decide(None, ctx(ValidationStatus::NonValidOverlap, false, 10)),
            ReinitAction::Keep
        );
    }
}
