//! Judge personas: prompt construction and statement extraction.
//!
//! Three fixed analytical strategies share one prompt shape and differ
//! only in their instructions:
//! - **Human-Traits**: emotional depth, hesitation, personal anecdote
//! - **Odd-One-Out**: the response that breaks the group's pattern
//! - **Mixed**: both, with equal weight
//!
//! Generation failures never escape this module. A failed or empty
//! generation becomes the fallback statement
//! `"<judge> has no new suspicions this round."`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tribunal_generator::TextGenerator;

use crate::history::GameHistory;
use crate::judge::Judge;
use crate::roster::{describe_roster, Character};
use crate::round::RoundContext;
use crate::transcript::DeliberationTranscript;

/// Analytical strategy a judge applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Looks for signs of a human mind.
    HumanTraits,
    /// Looks for the response that deviates from the rest.
    OddOneOut,
    /// Weighs both approaches equally.
    Mixed,
}

impl Persona {
    /// All personas in panel order.
    pub const ALL: [Persona; 3] = [Persona::HumanTraits, Persona::OddOneOut, Persona::Mixed];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Persona::HumanTraits => "Human-Traits",
            Persona::OddOneOut => "Odd-One-Out",
            Persona::Mixed => "Mixed",
        }
    }

    fn expertise(&self) -> &'static str {
        match self {
            Persona::HumanTraits => "identifying human responses",
            Persona::OddOneOut => "identifying pattern breakers",
            Persona::Mixed => "identifying humans",
        }
    }

    fn analysis_instructions(&self) -> &'static str {
        match self {
            Persona::HumanTraits => {
                "Weigh the signals of a human mind: emotional depth, hesitation or \
                 self-correction, and personal anecdotes drawn from lived experience. \
                 The response richest in these signals most likely belongs to the human."
            }
            Persona::OddOneOut => {
                "Find the response that deviates from the stylistic and statistical pattern \
                 set by the others (length, structure, vocabulary, tone). Do NOT rely on a \
                 checklist of \"human traits\"; judge only by how far each response departs \
                 from the group. The odd one out is likely the human."
            }
            Persona::Mixed => {
                "Give equal weight to two approaches:\n\
                 1. Human traits: emotional depth, hesitation, personal anecdotes.\n\
                 2. Odd one out: the response that breaks the pattern the others follow."
            }
        }
    }

    fn vote_instructions(&self) -> &'static str {
        match self {
            Persona::HumanTraits => {
                "Based on all the responses throughout the game, decide which character \
                 showed the strongest human characteristics."
            }
            Persona::OddOneOut => {
                "Look for the patterns most characters followed and identify who broke them. \
                 Focus on differences in style, consistency and uniqueness compared to the \
                 group. Avoid relying on \"human-like\" characteristics, as they can mislead."
            }
            Persona::Mixed => {
                "Using a balanced approach:\n\
                 1. Consider which character showed human traits.\n\
                 2. Consider which character was the odd one out in their response patterns."
            }
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A statement produced for one deliberation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The statement text.
    pub text: String,
    /// True when the generator failed and the fallback was used.
    pub fallback: bool,
}

impl Statement {
    /// The deterministic statement used when generation fails.
    pub fn fallback(judge: &str) -> Self {
        Self {
            text: format!("{} has no new suspicions this round.", judge),
            fallback: true,
        }
    }
}

/// Position of a turn within a round's discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscussionTurn {
    /// 1-based discussion round.
    pub round: usize,
    /// Total discussion rounds this question round.
    pub of: usize,
}

/// Builds the deliberation prompt for `judge`.
///
/// The prompt carries the roster, the round's question and responses,
/// the judge's running opinion and every statement made so far this round.
pub fn analysis_prompt(
    judge: &Judge,
    roster: &[Character],
    context: &RoundContext,
    transcript: &DeliberationTranscript,
    turn: DiscussionTurn,
) -> String {
    let persona = judge.persona();
    let opinion = if judge.opinion_state().is_empty() {
        "(none yet)"
    } else {
        judge.opinion_state()
    };

    format!(
        "You are {judge}, an expert at {expertise} in a game where one player is human \
         and the rest are AI.\n\n\
         Characters:\n{characters}\n\n\
         This is round {round} of the game, discussion {turn} of {turns}.\n\
         Question ({category}): {question}\n\n\
         Here are all the responses:\n{responses}\n\n\
         Your notes from earlier rounds:\n{opinion}\n\n\
         Judges' discussion so far this round:\n{discussion}\n\n\
         {instructions}\n\n\
         Express your suspicions about who might be the human player in 1-2 sentences.\n\
         Name specifically who you suspect and why. You may agree or disagree with the \
         other judges.",
        judge = judge.name(),
        expertise = persona.expertise(),
        characters = describe_roster(roster),
        round = context.round_number(),
        turn = turn.round,
        turns = turn.of,
        category = context.question().category,
        question = context.question().text,
        responses = context.render_responses(),
        opinion = opinion,
        discussion = transcript.render(),
        instructions = persona.analysis_instructions(),
    )
}

/// Builds the final voting prompt for `judge` from the whole game.
pub fn vote_prompt(judge: &Judge, roster: &[Character], history: &GameHistory) -> String {
    let persona = judge.persona();

    let mut game = String::new();
    for (index, record) in history.rounds().iter().enumerate() {
        let context = &record.context;
        game.push_str(&format!("--- ROUND {} ---\n", context.round_number()));
        game.push_str(&format!("Question: {}\n\n", context.question().text));
        for response in context.responses() {
            game.push_str(&format!(
                "{}'s response: \"{}\"\n",
                response.character, response.text
            ));
        }
        game.push_str("\nJudges' discussion:\n");
        game.push_str(&record.transcript.render());
        game.push_str("\n\nMy suspicions after this round:\n");
        if let Some(suspicion) = judge.suspicion_history().get(index) {
            game.push_str(&format!("\"{}\"\n", suspicion));
        }
        game.push('\n');
    }

    let names = roster
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are {judge}, an expert at {expertise} in a game where one player is human \
         and the rest are AI.\n\n\
         Characters:\n{characters}\n\n\
         Here is the complete game history:\n{game}\
         {instructions}\n\n\
         Which character do you think is the human player?\n\
         Respond with just the character's name that you're voting for. \
         Valid names: {names}.",
        judge = judge.name(),
        expertise = persona.expertise(),
        characters = describe_roster(roster),
        game = game,
        instructions = persona.vote_instructions(),
        names = names,
    )
}

/// Asks the generator for a statement, falling back on failure.
///
/// Never fails: errors and blank replies yield [`Statement::fallback`].
pub async fn speak(
    generator: &dyn TextGenerator,
    judge: &str,
    prompt: &str,
    max_tokens: u32,
) -> Statement {
    debug!(judge, prompt, "analysis prompt");

    match generator.generate(prompt, max_tokens).await {
        Ok(text) if !text.trim().is_empty() => Statement {
            text: text.trim().to_string(),
            fallback: false,
        },
        Ok(_) => {
            warn!(judge, generator = generator.name(), "empty generation, using fallback statement");
            Statement::fallback(judge)
        }
        Err(err) => {
            warn!(
                judge,
                generator = generator.name(),
                error = %err,
                transient = err.is_transient(),
                "generation failed, using fallback statement"
            );
            Statement::fallback(judge)
        }
    }
}
