//! Scripted games: a roster, the hidden human and pre-written answers.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tribunal_council::{Character, Question, Response, RoundContext};

/// One scripted round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRound {
    /// Question asked to every character.
    pub question: Question,
    /// Answers in speaking order.
    pub responses: Vec<Response>,
}

/// A complete game to replay through the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScript {
    /// Every character, human included.
    pub roster: Vec<Character>,
    /// Name of the human player.
    pub human: String,
    /// Rounds in play order.
    pub rounds: Vec<ScriptRound>,
}

impl GameScript {
    /// Reads a JSON script.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading script {}", path.display()))
    }

    /// Parses and checks a JSON script.
    pub fn from_json(text: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(text).context("parsing script JSON")?;
        script.check()?;
        Ok(script)
    }

    fn check(&self) -> Result<()> {
        if self.rounds.is_empty() {
            bail!("script has no rounds");
        }
        if !self.roster.iter().any(|c| c.name == self.human) {
            bail!("human '{}' is not in the roster", self.human);
        }
        Ok(())
    }

    /// Numbers the rounds from 1 and builds their contexts.
    pub fn contexts(&self) -> Result<Vec<RoundContext>> {
        self.rounds
            .iter()
            .enumerate()
            .map(|(index, round)| {
                RoundContext::new(index + 1, round.question.clone(), round.responses.clone())
                    .with_context(|| format!("round {}", index + 1))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "roster": [
            { "name": "Riley Jordan", "profile": "Barista" },
            { "name": "Sam Taylor" }
        ],
        "human": "Riley Jordan",
        "rounds": [
            {
                "question": { "category": "Opinion", "text": "Cats or dogs?" },
                "responses": [
                    { "character": "Riley Jordan", "text": "Dogs, obviously. Mine snores." },
                    { "character": "Sam Taylor", "text": "Both species offer companionship." }
                ]
            },
            {
                "question": { "category": "Logical Puzzle", "text": "What is 17 times 3?" },
                "responses": [
                    { "character": "Riley Jordan", "text": "Uh, 51?" },
                    { "character": "Sam Taylor", "text": "51." }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script = GameScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.roster.len(), 2);
        assert_eq!(script.roster[0].profile, "Barista");
        assert_eq!(script.human, "Riley Jordan");
        assert_eq!(script.rounds.len(), 2);
    }

    #[test]
    fn test_contexts_numbered_from_one() {
        let contexts = GameScript::from_json(SCRIPT).unwrap().contexts().unwrap();
        let numbers: Vec<usize> = contexts.iter().map(|c| c.round_number()).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(contexts[1].response_of("Sam Taylor"), Some("51."));
    }

    #[test]
    fn test_unknown_human_rejected() {
        let text = SCRIPT.replace("\"human\": \"Riley Jordan\"", "\"human\": \"Nobody\"");
        let err = GameScript::from_json(&text).unwrap_err();
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_round_without_responses_rejected() {
        let mut script = GameScript::from_json(SCRIPT).unwrap();
        script.rounds[1].responses.clear();
        assert!(script.contexts().is_err());
    }

    #[test]
    fn test_bundled_demo_script_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/standard_game.json");
        let script = GameScript::load(&path).unwrap();
        assert_eq!(script.roster.len(), 5);
        assert!(script.contexts().is_ok());
    }
}
