//! Judges and their accumulated state.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;
use crate::voting::Ballot;

/// An AI judge trying to spot the human.
///
/// Judges live for one game session. Their suspicion history and running
/// opinion are written only by the deliberation engine, and their ballot
/// only by the voting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judge {
    name: String,
    persona: Persona,
    suspicion_history: Vec<String>,
    opinion_state: String,
    final_vote: Option<Ballot>,
}

impl Judge {
    /// Creates a judge with empty history.
    pub fn new(name: impl Into<String>, persona: Persona) -> Self {
        Self {
            name: name.into(),
            persona,
            suspicion_history: Vec::new(),
            opinion_state: String::new(),
            final_vote: None,
        }
    }

    /// The judge's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The analytical strategy this judge follows.
    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// One settled suspicion per completed round, oldest first.
    pub fn suspicion_history(&self) -> &[String] {
        &self.suspicion_history
    }

    /// Running belief carried into the next round. Empty before round 1.
    pub fn opinion_state(&self) -> &str {
        &self.opinion_state
    }

    /// The ballot cast at game end, if voting has happened.
    pub fn final_vote(&self) -> Option<&Ballot> {
        self.final_vote.as_ref()
    }

    /// Closes a round: appends the settled suspicion and replaces the opinion.
    pub(crate) fn record_round(&mut self, suspicion: String, opinion: String) {
        self.suspicion_history.push(suspicion);
        self.opinion_state = opinion;
    }

    /// Stores the final ballot. The first ballot wins.
    pub(crate) fn cast_vote(&mut self, ballot: Ballot) {
        if self.final_vote.is_none() {
            self.final_vote = Some(ballot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::BallotSource;

    #[test]
    fn test_judge_new() {
        let judge = Judge::new("Judge Ada", Persona::HumanTraits);
        assert_eq!(judge.name(), "Judge Ada");
        assert_eq!(judge.persona(), Persona::HumanTraits);
        assert!(judge.suspicion_history().is_empty());
        assert!(judge.opinion_state().is_empty());
        assert!(judge.final_vote().is_none());
    }

    #[test]
    fn test_record_round_appends_and_replaces() {
        let mut judge = Judge::new("Judge Ada", Persona::Mixed);
        judge.record_round("Riley feels human.".to_string(), "Round 1: Riley.".to_string());
        judge.record_round("Still Riley.".to_string(), "Round 2: Riley again.".to_string());

        assert_eq!(judge.suspicion_history(), ["Riley feels human.", "Still Riley."]);
        assert_eq!(judge.opinion_state(), "Round 2: Riley again.");
    }

    #[test]
    fn test_cast_vote_is_set_once() {
        let mut judge = Judge::new("Judge Ada", Persona::OddOneOut);
        judge.cast_vote(Ballot::new("Judge Ada", "Riley Jordan", BallotSource::Parsed));
        judge.cast_vote(Ballot::new("Judge Ada", "Sam Taylor", BallotSource::Fallback));

        assert_eq!(judge.final_vote().unwrap().choice, "Riley Jordan");
    }
}
