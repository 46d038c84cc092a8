//! The character roster judged by the panel.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CouncilError;
use crate::Result;

/// A character taking part in the game.
///
/// Judges never learn which character is played by the human; that
/// name is only handed to the panel at verdict time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Unique display name, also the identity judges vote for.
    pub name: String,
    /// Short profile ("Tech Expert").
    #[serde(default)]
    pub profile: String,
    /// Personality traits.
    #[serde(default)]
    pub personality: String,
    /// Background story.
    #[serde(default)]
    pub background: String,
    /// Typical speech patterns.
    #[serde(default)]
    pub speech_style: String,
}

impl Character {
    /// Creates a character with only a name. Profile fields stay empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: String::new(),
            personality: String::new(),
            background: String::new(),
            speech_style: String::new(),
        }
    }

    /// Sets the profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the personality.
    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    /// Sets the background.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Sets the speech style.
    pub fn with_speech_style(mut self, speech_style: impl Into<String>) -> Self {
        self.speech_style = speech_style.into();
        self
    }

    /// Renders the character for inclusion in a prompt.
    pub fn prompt_description(&self) -> String {
        format!(
            "Character: {}\nProfile: {}\nPersonality: {}\nBackground: {}\nSpeech Style: {}",
            self.name, self.profile, self.personality, self.background, self.speech_style
        )
    }
}

/// Checks that a roster can be judged by judges named `judge_names`.
///
/// The roster must be non-empty, names must be unique and non-blank,
/// and no character may share a name with a judge.
pub fn validate_roster<'a>(
    roster: &[Character],
    judge_names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    if roster.is_empty() {
        return Err(CouncilError::InvalidRoster("roster is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for character in roster {
        let key = character.name.trim().to_lowercase();
        if key.is_empty() {
            return Err(CouncilError::InvalidRoster(
                "character name is blank".to_string(),
            ));
        }
        if !seen.insert(key) {
            return Err(CouncilError::InvalidRoster(format!(
                "duplicate character '{}'",
                character.name
            )));
        }
    }

    for judge in judge_names {
        if seen.contains(&judge.trim().to_lowercase()) {
            return Err(CouncilError::InvalidRoster(format!(
                "judge '{}' shares a name with a character",
                judge
            )));
        }
    }

    Ok(())
}

/// Renders every character description, separated by blank lines.
pub(crate) fn describe_roster(roster: &[Character]) -> String {
    roster
        .iter()
        .map(Character::prompt_description)
        .collect::<Vec<_>>()
        .join("\n\n")
}
