//! Multi-round inter-judge discussion for one question round.
//!
//! ```text
//! discussion 1:  J1 -> J2 -> J3     each judge reads every earlier statement
//! discussion 2:  J1 -> J2 -> J3
//!      ...
//! close round:   suspicion_history += last statement, opinion_state = synthesis
//! ```
//!
//! Generator calls are issued strictly one at a time: each statement depends
//! on the transcript so far.

use tracing::{debug, info};
use tribunal_generator::TextGenerator;

use crate::error::CouncilError;
use crate::judge::Judge;
use crate::persona::{analysis_prompt, speak, DiscussionTurn, Statement};
use crate::roster::Character;
use crate::round::RoundContext;
use crate::transcript::{DeliberationTranscript, TranscriptEntry};
use crate::Result;

/// Runs the judges' discussion for a round.
#[derive(Debug, Clone)]
pub struct DeliberationEngine {
    discussion_rounds: usize,
    max_tokens: u32,
}

impl DeliberationEngine {
    /// Creates an engine running `discussion_rounds` passes over the judges.
    ///
    /// # Errors
    ///
    /// Returns [`CouncilError::Config`] if `discussion_rounds` is zero.
    pub fn new(discussion_rounds: usize, max_tokens: u32) -> Result<Self> {
        if discussion_rounds == 0 {
            return Err(CouncilError::Config(
                "discussion_rounds must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            discussion_rounds,
            max_tokens,
        })
    }

    /// Number of passes over the judge list per round.
    pub fn discussion_rounds(&self) -> usize {
        self.discussion_rounds
    }

    /// Runs the discussion and closes the round on every judge.
    ///
    /// Judge state is only written after the last generator call, so a
    /// dropped future leaves every judge as it was.
    pub async fn deliberate(
        &self,
        generator: &dyn TextGenerator,
        roster: &[Character],
        context: &RoundContext,
        judges: &mut [Judge],
    ) -> DeliberationTranscript {
        let round = context.round_number();
        let mut transcript = DeliberationTranscript::new(round);

        for discussion_round in 1..=self.discussion_rounds {
            let turn = DiscussionTurn {
                round: discussion_round,
                of: self.discussion_rounds,
            };
            debug!(round, discussion_round, "discussion pass");

            for judge in judges.iter() {
                let prompt = analysis_prompt(judge, roster, context, &transcript, turn);
                let statement = speak(generator, judge.name(), &prompt, self.max_tokens).await;

                transcript.push(TranscriptEntry {
                    judge: judge.name().to_string(),
                    discussion_round,
                    statement: statement.text,
                    fallback: statement.fallback,
                });
            }
        }

        for judge in judges.iter_mut() {
            let (suspicion, opinion) = close_round(round, judge.name(), &transcript);
            judge.record_round(suspicion, opinion);
        }

        info!(
            round,
            statements = transcript.len(),
            fallbacks = transcript.fallback_count(),
            "deliberation complete"
        );
        transcript
    }
}

/// Derives a judge's settled suspicion and new opinion from its statements.
fn close_round(round: usize, judge: &str, transcript: &DeliberationTranscript) -> (String, String) {
    let own: Vec<&str> = transcript
        .statements_by(judge)
        .map(|e| e.statement.as_str())
        .collect();

    let suspicion = own
        .last()
        .map(|s| s.to_string())
        .unwrap_or_else(|| Statement::fallback(judge).text);

    let opinion = match own.split_first() {
        Some((first, rest)) if !rest.is_empty() => {
            format!("Round {}: {} Then: {}", round, first, rest.join(" Then: "))
        }
        Some((first, _)) => format!("Round {}: {}", round, first),
        None => String::new(),
    };

    (suspicion, opinion)
}
