//! Record of one round's inter-judge discussion.

use serde::{Deserialize, Serialize};

/// A single statement made during deliberation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Judge who made the statement.
    pub judge: String,
    /// 1-based discussion round within the question round.
    pub discussion_round: usize,
    /// What the judge said.
    pub statement: String,
    /// True when the statement is the deterministic fallback.
    pub fallback: bool,
}

/// Ordered statements from one deliberation session.
///
/// Entry order is judge order repeated once per discussion round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliberationTranscript {
    round_number: usize,
    entries: Vec<TranscriptEntry>,
}

impl DeliberationTranscript {
    /// Creates an empty transcript for `round_number`.
    pub fn new(round_number: usize) -> Self {
        Self {
            round_number,
            entries: Vec::new(),
        }
    }

    /// The question round this discussion belongs to.
    pub fn round_number(&self) -> usize {
        self.round_number
    }

    /// All statements, oldest first.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no statement was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Statements authored by `judge`, oldest first.
    pub fn statements_by<'a>(&'a self, judge: &'a str) -> impl Iterator<Item = &'a TranscriptEntry> {
        self.entries.iter().filter(move |e| e.judge == judge)
    }

    /// How many statements were fallbacks.
    pub fn fallback_count(&self) -> usize {
        self.entries.iter().filter(|e| e.fallback).count()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Renders the discussion for inclusion in a prompt.
    pub(crate) fn render(&self) -> String {
        if self.entries.is_empty() {
            return "(no statements yet)".to_string();
        }
        self.entries
            .iter()
            .map(|e| format!("[Discussion {}] {}: {}", e.discussion_round, e.judge, e.statement))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
