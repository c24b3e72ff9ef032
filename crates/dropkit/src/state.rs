//! Dropdown lifecycle state machine
//!
//! ```text
//!            open                 enter timer
//!  Closed ──────────▶ Opening ──────────────▶ Open
//!    ▲                 │  ▲                     │
//!    │ exit timer      │  │ open                │ close
//!    │                 ▼  │                     │
//!    └────────────── Closing ◀──────────────────┘
//! ```
//!
//! `CloseImmediate` jumps from any visible phase straight to `Closed`.
//! Opening during `Closing` goes back to `Opening` without passing through
//! `Closed`, so the close never completes.

use serde::{Deserialize, Serialize};

/// Phase of the open/close lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropdownPhase {
    /// Nothing rendered
    #[default]
    Closed,
    /// Enter animation is playing
    Opening,
    /// Fully open and idle
    Open,
    /// Exit animation is playing
    Closing,
}

/// Animation flag exposed to the rendering layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    #[default]
    Idle,
    Entering,
    Exiting,
}

/// Inputs of the lifecycle machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PhaseEvent {
    Open,
    Close,
    CloseImmediate,
    AnimationComplete,
}

impl DropdownPhase {
    /// Whether the dropdown counts as open
    ///
    /// True for every phase except `Closed`: the panel stays mounted while
    /// its exit animation plays.
    pub fn is_open(&self) -> bool {
        !matches!(self, DropdownPhase::Closed)
    }

    /// Check if an enter or exit animation is running
    pub fn is_animating(&self) -> bool {
        matches!(self, DropdownPhase::Opening | DropdownPhase::Closing)
    }

    pub fn animation_state(&self) -> AnimationState {
        match self {
            DropdownPhase::Opening => AnimationState::Entering,
            DropdownPhase::Closing => AnimationState::Exiting,
            DropdownPhase::Closed | DropdownPhase::Open => AnimationState::Idle,
        }
    }

    /// Next phase for an event, or `None` if the event does not apply
    pub(crate) fn on_event(&self, event: PhaseEvent) -> Option<Self> {
        use DropdownPhase::*;
        use PhaseEvent as E;

        match (self, event) {
            (Closed, E::Open) => Some(Opening),

            // Reopen while the exit animation plays
            (Closing, E::Open) => Some(Opening),

            (Opening, E::AnimationComplete) => Some(Open),
            (Closing, E::AnimationComplete) => Some(Closed),

            (Opening, E::Close) | (Open, E::Close) => Some(Closing),

            (Opening, E::CloseImmediate)
            | (Open, E::CloseImmediate)
            | (Closing, E::CloseImmediate) => Some(Closed),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut phase = DropdownPhase::Closed;
        for (event, expected) in [
            (PhaseEvent::Open, DropdownPhase::Opening),
            (PhaseEvent::AnimationComplete, DropdownPhase::Open),
            (PhaseEvent::Close, DropdownPhase::Closing),
            (PhaseEvent::AnimationComplete, DropdownPhase::Closed),
        ] {
            phase = phase.on_event(event).unwrap();
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn test_reopen_while_closing() {
        assert_eq!(
            DropdownPhase::Closing.on_event(PhaseEvent::Open),
            Some(DropdownPhase::Opening)
        );
    }

    #[test]
    fn test_redundant_events_are_rejected() {
        assert_eq!(DropdownPhase::Open.on_event(PhaseEvent::Open), None);
        assert_eq!(DropdownPhase::Opening.on_event(PhaseEvent::Open), None);
        assert_eq!(DropdownPhase::Closed.on_event(PhaseEvent::Close), None);
        assert_eq!(DropdownPhase::Closing.on_event(PhaseEvent::Close), None);
        assert_eq!(DropdownPhase::Closed.on_event(PhaseEvent::CloseImmediate), None);
        assert_eq!(DropdownPhase::Open.on_event(PhaseEvent::AnimationComplete), None);
    }

    #[test]
    fn test_close_immediate_from_any_visible_phase() {
        for phase in [
            DropdownPhase::Opening,
            DropdownPhase::Open,
            DropdownPhase::Closing,
        ] {
            assert_eq!(
                phase.on_event(PhaseEvent::CloseImmediate),
                Some(DropdownPhase::Closed)
            );
        }
    }

    #[test]
    fn test_is_open_and_animation_state() {
        assert!(!DropdownPhase::Closed.is_open());
        assert!(DropdownPhase::Closing.is_open());
        assert_eq!(DropdownPhase::Opening.animation_state(), AnimationState::Entering);
        assert_eq!(DropdownPhase::Closing.animation_state(), AnimationState::Exiting);
        assert_eq!(DropdownPhase::Open.animation_state(), AnimationState::Idle);
        assert!(!DropdownPhase::Open.is_animating());
    }
}
