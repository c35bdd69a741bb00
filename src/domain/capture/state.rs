//! Capture session states

use std::fmt;
use thiserror::Error;

/// Observable state of a capture session.
///
/// State machine:
///   UNINITIALIZED -> READY (initialize)
///   READY -> RECORDING (start)
///   RECORDING -> FINALIZING (stop)
///   FINALIZING -> UNINITIALIZED (clip produced, device released)
///   any -> UNINITIALIZED (cleanup)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Uninitialized,
    Ready,
    Recording,
    Finalizing,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
        }
    }

    /// Whether an input device is held in this state
    pub const fn holds_device(&self) -> bool {
        matches!(self, Self::Ready | Self::Recording)
    }

    /// Check that `action` is allowed from this state
    pub fn require(
        self,
        expected: CaptureState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self == expected {
            Ok(())
        } else {
            Err(InvalidStateTransition {
                current_state: self,
                action: action.to_string(),
            })
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an operation is called in the wrong state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uninitialized() {
        assert_eq!(CaptureState::default(), CaptureState::Uninitialized);
    }

    #[test]
    fn only_ready_and_recording_hold_device() {
        assert!(!CaptureState::Uninitialized.holds_device());
        assert!(CaptureState::Ready.holds_device());
        assert!(CaptureState::Recording.holds_device());
        assert!(!CaptureState::Finalizing.holds_device());
    }

    #[test]
    fn require_matching_state() {
        assert!(CaptureState::Ready.require(CaptureState::Ready, "start").is_ok());
    }

    #[test]
    fn require_other_state_fails() {
        let err = CaptureState::Recording
            .require(CaptureState::Uninitialized, "initialize")
            .unwrap_err();
        assert_eq!(err.current_state, CaptureState::Recording);
        assert_eq!(err.action, "initialize");
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Uninitialized.to_string(), "uninitialized");
        assert_eq!(CaptureState::Ready.to_string(), "ready");
        assert_eq!(CaptureState::Recording.to_string(), "recording");
        assert_eq!(CaptureState::Finalizing.to_string(), "finalizing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: CaptureState::Ready,
            action: "initialize".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("initialize"));
        assert!(msg.contains("ready"));
    }
}
