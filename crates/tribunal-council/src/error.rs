//! Error types for the judge panel.
//!
//! Only usage errors surface here. Generation failures and unparseable
//! votes are recovered inside the panel and never reach the caller.

use thiserror::Error;

use crate::panel::PanelState;

/// Errors that can occur during panel operations.
#[derive(Debug, Error)]
pub enum CouncilError {
    /// The panel is not in a state that accepts this operation.
    #[error("cannot {operation} while panel is {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// State the panel was in.
        state: PanelState,
    },

    /// A round arrived out of sequence.
    #[error("expected round {expected}, got round {actual}")]
    RoundOutOfOrder {
        /// Next round number the panel expects.
        expected: usize,
        /// Round number supplied by the caller.
        actual: usize,
    },

    /// A name does not belong to the character roster.
    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    /// The roster cannot be judged.
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    /// A round context is malformed.
    #[error("invalid round: {0}")]
    InvalidRound(String),

    /// A stored verdict contradicts its own ballots.
    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),

    /// Configuration is invalid or unreadable.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = CouncilError::InvalidState {
            operation: "final_verdict",
            state: PanelState::Voted,
        };
        let text = err.to_string();
        assert!(text.contains("final_verdict"));
        assert!(text.contains("voted"));
    }

    #[test]
    fn test_round_out_of_order_display() {
        let err = CouncilError::RoundOutOfOrder {
            expected: 2,
            actual: 4,
        };
        assert_eq!(err.to_string(), "expected round 2, got round 4");
    }

    #[test]
    fn test_unknown_character_display() {
        let err = CouncilError::UnknownCharacter("Nobody".to_string());
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_invalid_verdict_display() {
        let err = CouncilError::InvalidVerdict("tally mismatch".to_string());
        assert_eq!(err.to_string(), "invalid verdict: tally mismatch");
    }

    #[test]
    fn test_config_display() {
        let err = CouncilError::Config("discussion_rounds must be at least 1".to_string());
        assert!(err.to_string().contains("discussion_rounds"));
    }
}
