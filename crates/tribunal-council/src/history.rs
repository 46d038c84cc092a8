//! The game engine's record of completed rounds.

use serde::{Deserialize, Serialize};

use crate::error::CouncilError;
use crate::round::RoundContext;
use crate::transcript::DeliberationTranscript;
use crate::Result;

/// One completed round: what was asked and answered, and what the
/// judges said about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Question and responses.
    pub context: RoundContext,
    /// Judge discussion for the round.
    pub transcript: DeliberationTranscript,
}

/// Everything that happened before the vote, in round order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    rounds: Vec<RoundRecord>,
}

impl GameHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished round.
    ///
    /// # Errors
    ///
    /// Returns [`CouncilError::InvalidRound`] when the transcript belongs
    /// to a different round, or rounds are not consecutive.
    pub fn record(&mut self, context: RoundContext, transcript: DeliberationTranscript) -> Result<()> {
        if transcript.round_number() != context.round_number() {
            return Err(CouncilError::InvalidRound(format!(
                "transcript for round {} paired with round {}",
                transcript.round_number(),
                context.round_number()
            )));
        }

        let expected = self.rounds.len() + 1;
        if context.round_number() != expected {
            return Err(CouncilError::InvalidRound(format!(
                "history expects round {}, got round {}",
                expected,
                context.round_number()
            )));
        }

        self.rounds.push(RoundRecord {
            context,
            transcript,
        });
        Ok(())
    }

    /// Completed rounds, oldest first.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Number of completed rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// True before the first round is recorded.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
