//! # Judge Panel
//!
//! Multi-judge deliberation and voting for the Reverse Turing Test game.
//!
//! ## Overview
//!
//! One human hides among AI characters. Each round every character answers
//! the same question. A panel of AI judges, each with its own analytical
//! persona, discusses the answers in several passes, and after the last
//! round every judge casts one ballot for the character it believes is
//! human. The human wins when the panel accuses someone else.
//!
//! ## Failure Model
//!
//! Only usage errors (calling operations in the wrong order, malformed
//! rounds, unknown names) are reported to the caller. Everything that can
//! go wrong with the text generator is absorbed:
//!
//! | Failure                         | Outcome                              |
//! |---------------------------------|--------------------------------------|
//! | Generation fails during a round | Fallback statement, flagged          |
//! | Empty generation                | Fallback statement, flagged          |
//! | Generation fails during voting  | Random fallback ballot, flagged      |
//! | Vote names nobody or several    | Random fallback ballot, flagged      |
//!
//! ## Personas
//!
//! - **Human-Traits**: emotional depth, hesitation, personal anecdote
//! - **Odd-One-Out**: the response that breaks the group's pattern
//! - **Mixed**: both, weighted equally
//!
//! ## Architecture
//!
//! ```text
//!  ┌─────────────┐   RoundContext   ┌──────────────────────────────┐
//!  │ Game engine │ ───────────────▶ │          JudgePanel          │
//!  │ (caller)    │ ◀─────────────── │                              │
//!  └──────┬──────┘    transcript    │  ┌────────────────────────┐  │
//!         │                         │  │  DeliberationEngine    │  │
//!         ▼                         │  │  J1 → J2 → J3 (× N)    │  │
//!  ┌─────────────┐                  │  └───────────┬────────────┘  │
//!  │ GameHistory │ ───────────────▶ │  ┌───────────▼────────────┐  │
//!  └─────────────┘   final_verdict  │  │     VotingEngine       │  │
//!                                   │  │  ballots → Verdict     │  │
//!                                   │  └────────────────────────┘  │
//!                                   └──────────────┬───────────────┘
//!                                                  ▼
//!                                          dyn TextGenerator
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tribunal_council::{GameHistory, JudgePanel, PanelConfig};
//!
//! let mut panel = JudgePanel::new(PanelConfig::default(), roster, Arc::new(generator))?;
//! let mut history = GameHistory::new();
//!
//! for ctx in rounds {
//!     let transcript = panel.run_round(&ctx).await?;
//!     history.record(ctx, transcript)?;
//! }
//!
//! let verdict = panel.final_verdict(&history, "Riley Jordan").await?;
//! if verdict.human_won() {
//!     println!("The human escaped; the panel accused {}", verdict.accused());
//! }
//! ```

pub mod config;
pub mod deliberation;
pub mod error;
pub mod history;
pub mod judge;
pub mod panel;
pub mod persona;
pub mod roster;
pub mod round;
pub mod transcript;
pub mod voting;

pub use config::{JudgeSpec, PanelConfig};
pub use deliberation::DeliberationEngine;
pub use error::CouncilError;
pub use history::{GameHistory, RoundRecord};
pub use judge::Judge;
pub use panel::{JudgePanel, PanelState};
pub use persona::{Persona, Statement};
pub use roster::{validate_roster, Character};
pub use round::{Question, Response, RoundContext};
pub use transcript::{DeliberationTranscript, TranscriptEntry};
pub use voting::{parse_vote, resolve_accused, tally, Ballot, BallotSource, Verdict, VoteMatch, VotingEngine};

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, CouncilError>;
