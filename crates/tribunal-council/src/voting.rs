//! Final vote: ballot collection, vote parsing, tally and verdict.
//!
//! # Voting Rules
//!
//! - Each judge casts exactly one ballot for a roster character
//! - A reply that does not name exactly one character is replaced by a
//!   uniformly random fallback ballot, flagged as such
//! - Plurality wins
//! - Ties go to the character listed first in the roster (never random)
//! - The human wins when the accused is anyone but the human

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tribunal_generator::TextGenerator;

use crate::error::CouncilError;
use crate::history::GameHistory;
use crate::judge::Judge;
use crate::persona::vote_prompt;
use crate::roster::Character;
use crate::Result;

/// How a ballot's choice was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotSource {
    /// Parsed from the judge's reply.
    Parsed,
    /// Chosen at random after a failed generation or unusable reply.
    Fallback,
}

/// A single judge's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// The voting judge.
    pub judge: String,
    /// Character voted for.
    pub choice: String,
    /// Whether the choice was parsed or a fallback.
    pub source: BallotSource,
}

impl Ballot {
    /// Creates a ballot.
    pub fn new(judge: impl Into<String>, choice: impl Into<String>, source: BallotSource) -> Self {
        Self {
            judge: judge.into(),
            choice: choice.into(),
            source,
        }
    }

    /// True if this ballot is a fallback.
    pub fn is_fallback(&self) -> bool {
        self.source == BallotSource::Fallback
    }
}

/// Outcome of matching a free-text reply against candidate names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteMatch {
    /// The whole reply is a candidate name.
    Exact(String),
    /// Exactly one candidate was identified inside the reply, or the
    /// reply is a fragment of exactly one candidate name.
    Substring(String),
    /// Several candidates fit equally well.
    Ambiguous(Vec<String>),
    /// No candidate fits.
    NoMatch,
}

impl VoteMatch {
    /// The matched candidate, if the match is usable.
    pub fn name(&self) -> Option<&str> {
        match self {
            VoteMatch::Exact(name) | VoteMatch::Substring(name) => Some(name),
            VoteMatch::Ambiguous(_) | VoteMatch::NoMatch => None,
        }
    }
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '\u{2018}' | '\u{2019}' | '\u{201c}' | '\u{201d}')
}

/// Lowercases, collapses inner whitespace and trims punctuation at both ends.
fn normalize(text: &str) -> String {
    text.trim_matches(is_trimmable)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True if `needle` occurs in `haystack` not glued to other alphanumerics.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Matches a judge's reply against `candidates`.
///
/// Matching is case-insensitive and ignores surrounding whitespace and
/// punctuation. When one matched name is contained in another matched
/// name, the longer one wins. Failing a full-name match, a reply that
/// mentions a first name or surname belonging to exactly one candidate
/// counts for that candidate. Titles such as "Dr." never match alone.
///
/// # Example
///
/// ```rust
/// use tribunal_council::{parse_vote, VoteMatch};
///
/// let names = ["Riley Jordan", "Sam Taylor"];
/// assert_eq!(parse_vote("riley jordan.", &names), VoteMatch::Exact("Riley Jordan".into()));
/// assert_eq!(parse_vote("I vote for Sam Taylor!", &names), VoteMatch::Substring("Sam Taylor".into()));
/// assert_eq!(parse_vote("No idea", &names), VoteMatch::NoMatch);
/// ```
pub fn parse_vote<S: AsRef<str>>(text: &str, candidates: &[S]) -> VoteMatch {
    let reply = normalize(text);
    if reply.is_empty() {
        return VoteMatch::NoMatch;
    }

    let normalized: Vec<(String, &str)> = candidates
        .iter()
        .map(|c| (normalize(c.as_ref()), c.as_ref()))
        .filter(|(n, _)| !n.is_empty())
        .collect();

    if let Some((_, name)) = normalized.iter().find(|(n, _)| *n == reply) {
        return VoteMatch::Exact((*name).to_string());
    }

    let mentioned: Vec<&(String, &str)> = normalized
        .iter()
        .filter(|(n, _)| contains_word(&reply, n))
        .collect();
    let mentioned: Vec<&str> = mentioned
        .iter()
        .filter(|(n, _)| {
            !mentioned
                .iter()
                .any(|(other, _)| other.len() > n.len() && contains_word(other, n))
        })
        .map(|(_, name)| *name)
        .collect();

    match mentioned.as_slice() {
        [one] => return VoteMatch::Substring((*one).to_string()),
        [] => {}
        many => return VoteMatch::Ambiguous(many.iter().map(|s| s.to_string()).collect()),
    }

    let containing: Vec<&str> = normalized
        .iter()
        .filter(|(n, _)| contains_word(n, &reply))
        .map(|(_, name)| *name)
        .collect();

    match containing.as_slice() {
        [one] => return VoteMatch::Substring((*one).to_string()),
        [] => {}
        many => return VoteMatch::Ambiguous(many.iter().map(|s| s.to_string()).collect()),
    }

    let by_token: Vec<&str> = normalized
        .iter()
        .filter(|(n, _)| name_tokens(n).any(|token| contains_word(&reply, token)))
        .map(|(_, name)| *name)
        .collect();

    match by_token.as_slice() {
        [one] => VoteMatch::Substring((*one).to_string()),
        [] => VoteMatch::NoMatch,
        many => VoteMatch::Ambiguous(many.iter().map(|s| s.to_string()).collect()),
    }
}

const HONORIFICS: [&str; 8] = ["dr", "prof", "professor", "mr", "mrs", "ms", "miss", "sir"];

/// Distinctive words of a normalized name: no titles, no initials.
fn name_tokens(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
        .map(|token| token.trim_matches(is_trimmable))
        .filter(|token| token.chars().count() > 1 && !HONORIFICS.contains(token))
}

/// Counts votes per character.
pub fn tally<'a>(ballots: impl IntoIterator<Item = &'a Ballot>) -> BTreeMap<String, usize> {
    let mut votes = BTreeMap::new();
    for ballot in ballots {
        *votes.entry(ballot.choice.clone()).or_insert(0) += 1;
    }
    votes
}

/// Picks the plurality winner, breaking ties by roster order.
///
/// Returns `None` when no roster character received a vote.
pub fn resolve_accused<S: AsRef<str>>(votes: &BTreeMap<String, usize>, roster_order: &[S]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for name in roster_order {
        let name = name.as_ref();
        let count = votes.get(name).copied().unwrap_or(0);
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// The panel's final decision.
///
/// Created once per game and immutable afterwards. Deserializing
/// recomputes the outcome from the stored ballots and rejects a record
/// whose tally, accused or `human_won` disagree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VerdictRecord")]
pub struct Verdict {
    candidates: Vec<String>,
    human: String,
    votes: BTreeMap<String, usize>,
    accused: String,
    human_won: bool,
    ballots: Vec<Ballot>,
    fallback_votes: usize,
}

/// Wire form of [`Verdict`], checked before it becomes one.
#[derive(Deserialize)]
struct VerdictRecord {
    candidates: Vec<String>,
    human: String,
    votes: BTreeMap<String, usize>,
    accused: String,
    human_won: bool,
    ballots: Vec<Ballot>,
    fallback_votes: usize,
}

impl TryFrom<VerdictRecord> for Verdict {
    type Error = CouncilError;

    fn try_from(record: VerdictRecord) -> Result<Self> {
        let verdict = Self::decide(record.ballots, record.candidates, &record.human)?;
        if verdict.votes != record.votes
            || verdict.accused != record.accused
            || verdict.human_won != record.human_won
            || verdict.fallback_votes != record.fallback_votes
        {
            return Err(CouncilError::InvalidVerdict(format!(
                "stored outcome (accused '{}') does not match its ballots (accused '{}')",
                record.accused, verdict.accused
            )));
        }
        Ok(verdict)
    }
}

impl Verdict {
    /// Builds the verdict from cast ballots.
    ///
    /// # Errors
    ///
    /// Returns [`CouncilError::UnknownCharacter`] if a ballot or the
    /// human name is not on the roster, and [`CouncilError::InvalidRoster`]
    /// if there are no ballots.
    pub fn from_ballots(ballots: Vec<Ballot>, roster: &[Character], human_name: &str) -> Result<Self> {
        let candidates = roster.iter().map(|c| c.name.clone()).collect();
        Self::decide(ballots, candidates, human_name)
    }

    fn decide(ballots: Vec<Ballot>, candidates: Vec<String>, human_name: &str) -> Result<Self> {
        if !candidates.iter().any(|c| c == human_name) {
            return Err(CouncilError::UnknownCharacter(human_name.to_string()));
        }
        if let Some(stray) = ballots.iter().find(|b| !candidates.contains(&b.choice)) {
            return Err(CouncilError::UnknownCharacter(stray.choice.clone()));
        }

        let votes = tally(&ballots);
        let accused = resolve_accused(&votes, &candidates)
            .ok_or_else(|| CouncilError::InvalidRoster("no ballots were cast".to_string()))?;
        let human_won = accused != human_name;
        let fallback_votes = ballots.iter().filter(|b| b.is_fallback()).count();

        Ok(Self {
            candidates,
            human: human_name.to_string(),
            votes,
            accused,
            human_won,
            ballots,
            fallback_votes,
        })
    }

    /// Characters in roster order, as used for tie-breaks.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The human player's name.
    pub fn human(&self) -> &str {
        &self.human
    }

    /// Votes received per character.
    pub fn votes(&self) -> &BTreeMap<String, usize> {
        &self.votes
    }

    /// The character the panel believes is human.
    pub fn accused(&self) -> &str {
        &self.accused
    }

    /// True if the human escaped detection.
    pub fn human_won(&self) -> bool {
        self.human_won
    }

    /// Ballots in judge order.
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// Number of ballots that were random fallbacks.
    pub fn fallback_votes(&self) -> usize {
        self.fallback_votes
    }
}

/// Collects one ballot per judge.
#[derive(Debug, Clone)]
pub struct VotingEngine {
    max_tokens: u32,
}

impl VotingEngine {
    /// Creates an engine that caps each vote reply at `max_tokens`.
    pub fn new(max_tokens: u32) -> Self {
        Self { max_tokens }
    }

    /// Asks every judge, in order, for a vote and records it on the judge.
    ///
    /// Generation failures and unusable replies turn into fallback ballots.
    /// Ballots are recorded on the judges only after the last generator
    /// call, so a dropped future leaves every judge without a vote.
    pub async fn cast_ballots(
        &self,
        generator: &dyn TextGenerator,
        roster: &[Character],
        history: &GameHistory,
        judges: &mut [Judge],
        rng: &mut StdRng,
    ) -> Vec<Ballot> {
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        let mut ballots = Vec::with_capacity(judges.len());

        for judge in judges.iter() {
            let prompt = vote_prompt(judge, roster, history);
            debug!(judge = judge.name(), prompt = %prompt, "vote prompt");

            let parsed = match generator.generate(&prompt, self.max_tokens).await {
                Ok(reply) => {
                    let outcome = parse_vote(&reply, &names);
                    if outcome.name().is_none() {
                        warn!(judge = judge.name(), reply = %reply, outcome = ?outcome, "unusable vote reply");
                    }
                    outcome.name().map(str::to_string)
                }
                Err(err) => {
                    warn!(judge = judge.name(), error = %err, "vote generation failed");
                    None
                }
            };

            let ballot = match parsed {
                Some(choice) => Ballot::new(judge.name(), choice, BallotSource::Parsed),
                None => {
                    let candidates: Vec<&str> = names
                        .iter()
                        .copied()
                        .filter(|n| !n.eq_ignore_ascii_case(judge.name()))
                        .collect();
                    let Some(choice) = candidates.choose(rng) else {
                        warn!(judge = judge.name(), "no candidates for fallback ballot");
                        continue;
                    };
                    Ballot::new(judge.name(), *choice, BallotSource::Fallback)
                }
            };

            info!(
                judge = %ballot.judge,
                choice = %ballot.choice,
                fallback = ballot.is_fallback(),
                "ballot cast"
            );
            ballots.push(ballot);
        }

        for judge in judges.iter_mut() {
            if let Some(ballot) = ballots.iter().find(|b| b.judge == judge.name()) {
                judge.cast_vote(ballot.clone());
            }
        }
        ballots
    }
}
