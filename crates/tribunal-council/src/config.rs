//! Configuration for the judge panel.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CouncilError;
use crate::judge::Judge;
use crate::persona::Persona;
use crate::Result;

/// Identity and strategy of one judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeSpec {
    /// Display name. Must not collide with a character name.
    pub name: String,
    /// Analytical strategy.
    pub persona: Persona,
}

impl JudgeSpec {
    /// Creates a judge spec.
    pub fn new(name: impl Into<String>, persona: Persona) -> Self {
        Self {
            name: name.into(),
            persona,
        }
    }

    /// Builds a fresh judge from this spec.
    pub fn build(&self) -> Judge {
        Judge::new(self.name.clone(), self.persona)
    }
}

/// Configuration for a [`JudgePanel`](crate::JudgePanel).
///
/// # Example
///
/// ```rust
/// use tribunal_council::PanelConfig;
///
/// let config = PanelConfig::default()
///     .with_discussion_rounds(3)
///     .with_expected_rounds(5)
///     .with_vote_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Passes over the judge list per question round.
    pub discussion_rounds: usize,

    /// Token ceiling for every generator call.
    pub max_tokens: u32,

    /// Question rounds before voting opens. `None` opens voting after
    /// the first round and accepts any number of rounds.
    pub expected_rounds: Option<usize>,

    /// Seed for fallback ballots. `None` seeds from entropy.
    pub vote_seed: Option<u64>,

    /// Judges in speaking order.
    pub judges: Vec<JudgeSpec>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            discussion_rounds: 2,
            max_tokens: 150,
            expected_rounds: None,
            vote_seed: None,
            judges: vec![
                JudgeSpec::new("Judge Ada", Persona::HumanTraits),
                JudgeSpec::new("Judge Blaise", Persona::OddOneOut),
                JudgeSpec::new("Judge Grace", Persona::Mixed),
            ],
        }
    }
}

impl PanelConfig {
    /// Parses a TOML document. Missing keys take default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| CouncilError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CouncilError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration for values the panel cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.discussion_rounds == 0 {
            return Err(CouncilError::Config(
                "discussion_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(CouncilError::Config(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if self.expected_rounds == Some(0) {
            return Err(CouncilError::Config(
                "expected_rounds must be at least 1".to_string(),
            ));
        }
        if self.judges.is_empty() {
            return Err(CouncilError::Config("at least one judge is required".to_string()));
        }

        let mut seen = HashSet::new();
        for judge in &self.judges {
            if judge.name.trim().is_empty() {
                return Err(CouncilError::Config("judge name is blank".to_string()));
            }
            if !seen.insert(judge.name.trim().to_lowercase()) {
                return Err(CouncilError::Config(format!(
                    "duplicate judge '{}'",
                    judge.name
                )));
            }
        }
        Ok(())
    }

    /// Sets the number of discussion rounds.
    #[must_use]
    pub fn with_discussion_rounds(mut self, rounds: usize) -> Self {
        self.discussion_rounds = rounds;
        self
    }

    /// Sets the token ceiling.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Requires exactly `rounds` question rounds before voting.
    #[must_use]
    pub fn with_expected_rounds(mut self, rounds: usize) -> Self {
        self.expected_rounds = Some(rounds);
        self
    }

    /// Seeds the fallback-ballot RNG.
    #[must_use]
    pub fn with_vote_seed(mut self, seed: u64) -> Self {
        self.vote_seed = Some(seed);
        self
    }

    /// Replaces the judge line-up.
    #[must_use]
    pub fn with_judges(mut self, judges: Vec<JudgeSpec>) -> Self {
        self.judges = judges;
        self
    }
}
