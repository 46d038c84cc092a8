//! Per-round snapshots handed to the panel by the game engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CouncilError;
use crate::Result;

/// A question asked to every character in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Category, e.g. "Ethical Dilemma".
    pub category: String,
    /// The question text.
    pub text: String,
}

impl Question {
    /// Creates a question.
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }
}

/// One character's answer to the round's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Name of the answering character.
    pub character: String,
    /// The answer.
    pub text: String,
}

impl Response {
    /// Creates a response.
    pub fn new(character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            text: text.into(),
        }
    }
}

/// Immutable snapshot of one question round.
///
/// Responses keep their speaking order. Fields are read-only once the
/// context is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    round_number: usize,
    question: Question,
    responses: Vec<Response>,
}

impl RoundContext {
    /// Builds a round snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CouncilError::InvalidRound`] for round 0, an empty
    /// response list, or two responses from the same character.
    pub fn new(round_number: usize, question: Question, responses: Vec<Response>) -> Result<Self> {
        let context = Self {
            round_number,
            question,
            responses,
        };
        context.check()?;
        Ok(context)
    }

    /// 1-based round number.
    pub fn round_number(&self) -> usize {
        self.round_number
    }

    /// The question asked this round.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Responses in speaking order.
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Looks up the response given by `character`.
    pub fn response_of(&self, character: &str) -> Option<&str> {
        self.responses
            .iter()
            .find(|r| r.character == character)
            .map(|r| r.text.as_str())
    }

    /// Renders responses as `Name: "text"` lines.
    pub(crate) fn render_responses(&self) -> String {
        self.responses
            .iter()
            .map(|r| format!("{}: \"{}\"", r.character, r.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Re-checks structural invariants. Deserialized contexts skip `new`.
    pub(crate) fn check(&self) -> Result<()> {
        if self.round_number == 0 {
            return Err(CouncilError::InvalidRound(
                "round numbers start at 1".to_string(),
            ));
        }
        if self.responses.is_empty() {
            return Err(CouncilError::InvalidRound(format!(
                "round {} has no responses",
                self.round_number
            )));
        }

        let mut seen = HashSet::new();
        for response in &self.responses {
            if !seen.insert(response.character.as_str()) {
                return Err(CouncilError::InvalidRound(format!(
                    "'{}' answered twice in round {}",
                    response.character, self.round_number
                )));
            }
        }
        Ok(())
    }
}
