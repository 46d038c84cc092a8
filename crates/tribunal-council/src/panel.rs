//! Judge panel facade integrating deliberation and voting.
//!
//! The main entry point for the game engine. The panel owns the judges,
//! sequences rounds and produces a single verdict.
//!
//! ```text
//!   AwaitingRounds ──run_round──▶ ReadyToVote ──final_verdict──▶ Voted
//!        ▲   │                      │    ▲
//!        └───┘ (expected rounds     └────┘ (more rounds, when the
//!              not yet reached)            round count is open)
//! ```

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use tribunal_generator::TextGenerator;
use uuid::Uuid;

use crate::config::PanelConfig;
use crate::deliberation::DeliberationEngine;
use crate::error::CouncilError;
use crate::history::GameHistory;
use crate::judge::Judge;
use crate::roster::{validate_roster, Character};
use crate::round::RoundContext;
use crate::transcript::DeliberationTranscript;
use crate::voting::{Verdict, VotingEngine};
use crate::Result;

/// Lifecycle state of a [`JudgePanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    /// More question rounds are required before voting.
    AwaitingRounds,
    /// Voting is open.
    ReadyToVote,
    /// The verdict has been produced.
    Voted,
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PanelState::AwaitingRounds => "awaiting rounds",
            PanelState::ReadyToVote => "ready to vote",
            PanelState::Voted => "voted",
        };
        f.write_str(text)
    }
}

/// A panel of judges trying to spot the human among AI characters.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tribunal_council::{Character, GameHistory, JudgePanel, PanelConfig, Question, Response, RoundContext};
///
/// let roster = vec![Character::named("Riley Jordan"), Character::named("Sam Taylor")];
/// let mut panel = JudgePanel::new(PanelConfig::default(), roster, Arc::new(generator))?;
/// let mut history = GameHistory::new();
///
/// let ctx = RoundContext::new(1, Question::new("Opinion", "Cats or dogs?"), responses)?;
/// let transcript = panel.run_round(&ctx).await?;
/// history.record(ctx, transcript)?;
///
/// let verdict = panel.final_verdict(&history, "Riley Jordan").await?;
/// println!("accused: {}, human won: {}", verdict.accused(), verdict.human_won());
/// ```
pub struct JudgePanel {
    session_id: Uuid,
    roster: Vec<Character>,
    judges: Vec<Judge>,
    generator: Arc<dyn TextGenerator>,
    deliberation: DeliberationEngine,
    voting: VotingEngine,
    expected_rounds: Option<usize>,
    state: PanelState,
    rounds_completed: usize,
    verdict: Option<Verdict>,
    rng: StdRng,
}

impl fmt::Debug for JudgePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JudgePanel")
            .field("session_id", &self.session_id)
            .field("generator", &self.generator.name())
            .field("judges", &self.judges)
            .field("state", &self.state)
            .field("rounds_completed", &self.rounds_completed)
            .finish_non_exhaustive()
    }
}

impl JudgePanel {
    /// Creates a panel for `roster`.
    ///
    /// # Errors
    ///
    /// Returns [`CouncilError::Config`] for an unusable configuration and
    /// [`CouncilError::InvalidRoster`] when the roster is empty, has
    /// duplicate names, or shares a name with a judge.
    pub fn new(config: PanelConfig, roster: Vec<Character>, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        config.validate()?;
        validate_roster(&roster, config.judges.iter().map(|j| j.name.as_str()))?;

        let rng = match config.vote_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let deliberation = DeliberationEngine::new(config.discussion_rounds, config.max_tokens)?;
        let session_id = Uuid::new_v4();

        info!(
            session = %session_id,
            judges = config.judges.len(),
            characters = roster.len(),
            generator = generator.name(),
            "judge panel created"
        );

        Ok(Self {
            session_id,
            judges: config.judges.iter().map(|j| j.build()).collect(),
            roster,
            generator,
            deliberation,
            voting: VotingEngine::new(config.max_tokens),
            expected_rounds: config.expected_rounds,
            state: PanelState::AwaitingRounds,
            rounds_completed: 0,
            verdict: None,
            rng,
        })
    }

    /// Runs the judges' discussion for one question round.
    ///
    /// Rounds must arrive in order starting at 1. Generation failures are
    /// absorbed as fallback statements and never fail the round.
    ///
    /// # Errors
    ///
    /// - [`CouncilError::InvalidState`] after the verdict, or once the
    ///   expected number of rounds has been run
    /// - [`CouncilError::RoundOutOfOrder`] for a non-consecutive round
    /// - [`CouncilError::InvalidRound`] for a malformed context
    /// - [`CouncilError::UnknownCharacter`] if a response names a
    ///   character outside the roster
    pub async fn run_round(&mut self, ctx: &RoundContext) -> Result<DeliberationTranscript> {
        let full = self
            .expected_rounds
            .map_or(false, |expected| self.rounds_completed >= expected);
        if self.state == PanelState::Voted || full {
            return Err(CouncilError::InvalidState {
                operation: "run_round",
                state: self.state,
            });
        }

        ctx.check()?;

        let expected = self.rounds_completed + 1;
        if ctx.round_number() != expected {
            return Err(CouncilError::RoundOutOfOrder {
                expected,
                actual: ctx.round_number(),
            });
        }

        if let Some(stray) = ctx
            .responses()
            .iter()
            .find(|r| !self.roster.iter().any(|c| c.name == r.character))
        {
            return Err(CouncilError::UnknownCharacter(stray.character.clone()));
        }

        let span = info_span!("round", session = %self.session_id, round = expected);
        let transcript = self
            .deliberation
            .deliberate(self.generator.as_ref(), &self.roster, ctx, &mut self.judges)
            .instrument(span)
            .await;

        self.rounds_completed = expected;
        self.state = match self.expected_rounds {
            Some(n) if expected < n => PanelState::AwaitingRounds,
            _ => PanelState::ReadyToVote,
        };

        info!(
            session = %self.session_id,
            round = expected,
            state = %self.state,
            "round complete"
        );
        Ok(transcript)
    }

    /// Collects one ballot per judge and produces the verdict.
    ///
    /// Can be called exactly once, after the required rounds.
    ///
    /// # Errors
    ///
    /// - [`CouncilError::InvalidState`] before the required rounds or on a
    ///   second call
    /// - [`CouncilError::InvalidRound`] if `history` does not cover the
    ///   rounds this panel ran
    /// - [`CouncilError::UnknownCharacter`] if `human_name` is not on the
    ///   roster
    pub async fn final_verdict(&mut self, history: &GameHistory, human_name: &str) -> Result<Verdict> {
        if self.state != PanelState::ReadyToVote {
            return Err(CouncilError::InvalidState {
                operation: "final_verdict",
                state: self.state,
            });
        }
        if history.len() != self.rounds_completed {
            return Err(CouncilError::InvalidRound(format!(
                "history holds {} rounds, panel ran {}",
                history.len(),
                self.rounds_completed
            )));
        }
        if !self.roster.iter().any(|c| c.name == human_name) {
            return Err(CouncilError::UnknownCharacter(human_name.to_string()));
        }

        let span = info_span!("vote", session = %self.session_id);
        let ballots = self
            .voting
            .cast_ballots(
                self.generator.as_ref(),
                &self.roster,
                history,
                &mut self.judges,
                &mut self.rng,
            )
            .instrument(span)
            .await;

        let verdict = Verdict::from_ballots(ballots, &self.roster, human_name)?;
        self.state = PanelState::Voted;
        self.verdict = Some(verdict.clone());

        info!(
            session = %self.session_id,
            accused = verdict.accused(),
            human_won = verdict.human_won(),
            fallback_votes = verdict.fallback_votes(),
            "verdict reached"
        );
        Ok(verdict)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Judges in speaking order.
    pub fn judges(&self) -> &[Judge] {
        &self.judges
    }

    /// Characters under suspicion.
    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    /// The verdict, once produced.
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Identifier attached to this panel's log events.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of question rounds run so far.
    pub fn rounds_completed(&self) -> usize {
        self.rounds_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JudgeSpec;
    use crate::voting::Ballot;
    use crate::persona::Persona;
    use crate::round::{Question, Response};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tribunal_generator::mock::{FailingGenerator, FnGenerator, ScriptedGenerator};

    /// Votes for Riley Jordan first, never answers the second vote request,
    /// then votes for Sam Taylor on every later request.
    struct StallingVoter {
        vote_calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for StallingVoter {
        fn name(&self) -> &str {
            "stalling"
        }

        async fn generate(&self, prompt: &str, _max_tokens: u32) -> tribunal_generator::Result<String> {
            if !prompt.contains("Valid names:") {
                return Ok("Riley Jordan sounds unsure.".to_string());
            }
            match self.vote_calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok("Riley Jordan".to_string()),
                1 => std::future::pending().await,
                _ => Ok("Sam Taylor".to_string()),
            }
        }
    }

    fn roster() -> Vec<Character> {
        vec![
            Character::named("Riley Jordan"),
            Character::named("Sam Taylor"),
            Character::named("Jamie Wilson"),
        ]
    }

    fn context(round: usize) -> RoundContext {
        RoundContext::new(
            round,
            Question::new("Personal Experience", "What did you do last weekend?"),
            vec![
                Response::new("Riley Jordan", "Honestly? Mostly laundry, and a bit of guilt about it."),
                Response::new("Sam Taylor", "I engaged in a variety of enriching activities."),
                Response::new("Jamie Wilson", "I organized my bookshelf by color."),
            ],
        )
        .unwrap()
    }

    fn config() -> PanelConfig {
        PanelConfig::default().with_discussion_rounds(1).with_vote_seed(7)
    }

    fn echo() -> Arc<dyn TextGenerator> {
        Arc::new(FnGenerator::new(|_: &str| Ok("I suspect Sam Taylor.".to_string())))
    }

    async fn play(panel: &mut JudgePanel, rounds: usize) -> GameHistory {
        let mut history = GameHistory::new();
        for round in 1..=rounds {
            let ctx = context(round);
            let transcript = panel.run_round(&ctx).await.unwrap();
            history.record(ctx, transcript).unwrap();
        }
        history
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_panel_awaits_rounds() {
        let panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        assert_eq!(panel.state(), PanelState::AwaitingRounds);
        assert_eq!(panel.judges().len(), 3);
        assert_eq!(panel.rounds_completed(), 0);
        assert!(panel.verdict().is_none());
    }

    #[test]
    fn test_new_rejects_empty_roster() {
        let result = JudgePanel::new(config(), vec![], echo());
        assert!(matches!(result, Err(CouncilError::InvalidRoster(_))));
    }

    #[test]
    fn test_new_rejects_judge_named_like_character() {
        let config = config().with_judges(vec![JudgeSpec::new("Sam Taylor", Persona::Mixed)]);
        let result = JudgePanel::new(config, roster(), echo());
        assert!(matches!(result, Err(CouncilError::InvalidRoster(_))));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = JudgePanel::new(config().with_max_tokens(0), roster(), echo());
        assert!(matches!(result, Err(CouncilError::Config(_))));
    }

    #[test]
    fn test_panel_state_display() {
        assert_eq!(PanelState::AwaitingRounds.to_string(), "awaiting rounds");
        assert_eq!(PanelState::ReadyToVote.to_string(), "ready to vote");
        assert_eq!(PanelState::Voted.to_string(), "voted");
    }

    // =========================================================================
    // Rounds
    // =========================================================================

    #[tokio::test]
    async fn test_round_opens_voting() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let transcript = panel.run_round(&context(1)).await.unwrap();

        assert_eq!(transcript.len(), 3);
        assert_eq!(panel.state(), PanelState::ReadyToVote);
        assert_eq!(panel.rounds_completed(), 1);
    }

    #[tokio::test]
    async fn test_round_out_of_order() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let result = panel.run_round(&context(2)).await;

        assert!(matches!(
            result,
            Err(CouncilError::RoundOutOfOrder { expected: 1, actual: 2 })
        ));
        assert_eq!(panel.state(), PanelState::AwaitingRounds);
    }

    #[tokio::test]
    async fn test_round_with_stranger_rejected() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let ctx = RoundContext::new(
            1,
            Question::new("Opinion", "Tea or coffee?"),
            vec![Response::new("Somebody Else", "Tea.")],
        )
        .unwrap();

        let result = panel.run_round(&ctx).await;
        assert!(matches!(result, Err(CouncilError::UnknownCharacter(name)) if name == "Somebody Else"));
        assert!(panel.judges().iter().all(|j| j.suspicion_history().is_empty()));
    }

    #[tokio::test]
    async fn test_expected_rounds_gate_voting() {
        let mut panel = JudgePanel::new(config().with_expected_rounds(2), roster(), echo()).unwrap();

        panel.run_round(&context(1)).await.unwrap();
        assert_eq!(panel.state(), PanelState::AwaitingRounds);
        let early = panel.final_verdict(&GameHistory::new(), "Riley Jordan").await;
        assert!(matches!(early, Err(CouncilError::InvalidState { .. })));

        panel.run_round(&context(2)).await.unwrap();
        assert_eq!(panel.state(), PanelState::ReadyToVote);

        let extra = panel.run_round(&context(3)).await;
        assert!(matches!(extra, Err(CouncilError::InvalidState { operation: "run_round", .. })));
    }

    // =========================================================================
    // Verdict
    // =========================================================================

    #[tokio::test]
    async fn test_final_verdict_once() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let history = play(&mut panel, 1).await;

        let verdict = panel.final_verdict(&history, "Riley Jordan").await.unwrap();
        assert_eq!(verdict.accused(), "Sam Taylor");
        assert!(verdict.human_won());
        assert_eq!(panel.state(), PanelState::Voted);
        assert_eq!(panel.verdict(), Some(&verdict));
        assert!(panel.judges().iter().all(|j| j.final_vote().is_some()));

        let again = panel.final_verdict(&history, "Riley Jordan").await;
        assert!(matches!(
            again,
            Err(CouncilError::InvalidState { state: PanelState::Voted, .. })
        ));
        let late = panel.run_round(&context(2)).await;
        assert!(matches!(late, Err(CouncilError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_final_verdict_before_any_round() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let result = panel.final_verdict(&GameHistory::new(), "Riley Jordan").await;
        assert!(matches!(
            result,
            Err(CouncilError::InvalidState { state: PanelState::AwaitingRounds, .. })
        ));
    }

    #[tokio::test]
    async fn test_final_verdict_unknown_human() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        let history = play(&mut panel, 1).await;

        let result = panel.final_verdict(&history, "Nobody").await;
        assert!(matches!(result, Err(CouncilError::UnknownCharacter(_))));
        assert_eq!(panel.state(), PanelState::ReadyToVote);
        assert!(panel.judges().iter().all(|j| j.final_vote().is_none()));
    }

    #[tokio::test]
    async fn test_final_verdict_history_mismatch() {
        let mut panel = JudgePanel::new(config(), roster(), echo()).unwrap();
        play(&mut panel, 1).await;

        let result = panel.final_verdict(&GameHistory::new(), "Riley Jordan").await;
        assert!(matches!(result, Err(CouncilError::InvalidRound(_))));
    }

    #[tokio::test]
    async fn test_abandoned_vote_leaves_judges_unvoted() {
        let generator = Arc::new(StallingVoter {
            vote_calls: AtomicUsize::new(0),
        });
        let mut panel = JudgePanel::new(config(), roster(), generator).unwrap();
        let history = play(&mut panel, 1).await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), panel.final_verdict(&history, "Riley Jordan")).await;
        assert!(abandoned.is_err());
        assert_eq!(panel.state(), PanelState::ReadyToVote);
        assert!(panel.judges().iter().all(|j| j.final_vote().is_none()));

        let verdict = panel.final_verdict(&history, "Riley Jordan").await.unwrap();
        let recorded: Vec<Option<&Ballot>> = panel.judges().iter().map(|j| j.final_vote()).collect();
        let cast: Vec<Option<&Ballot>> = verdict.ballots().iter().map(Some).collect();
        assert_eq!(recorded, cast);
        assert_eq!(verdict.accused(), "Sam Taylor");
    }

    #[tokio::test]
    async fn test_human_caught() {
        let generator: Arc<dyn TextGenerator> = Arc::new(ScriptedGenerator::new([
            "a", "b", "c", "Riley Jordan", "Riley Jordan", "Sam Taylor",
        ]));
        let mut panel = JudgePanel::new(config(), roster(), generator).unwrap();
        let history = play(&mut panel, 1).await;

        let verdict = panel.final_verdict(&history, "Riley Jordan").await.unwrap();
        assert_eq!(verdict.accused(), "Riley Jordan");
        assert!(!verdict.human_won());
        assert_eq!(verdict.votes().get("Riley Jordan"), Some(&2));
    }

    #[tokio::test]
    async fn test_offline_game_completes_with_fallbacks() {
        let mut panel = JudgePanel::new(config(), roster(), Arc::new(FailingGenerator::default())).unwrap();
        let history = play(&mut panel, 2).await;

        let verdict = panel.final_verdict(&history, "Jamie Wilson").await.unwrap();
        assert_eq!(verdict.fallback_votes(), 3);
        assert_eq!(verdict.ballots().len(), 3);
        for judge in panel.judges() {
            assert_eq!(judge.suspicion_history().len(), 2);
        }
    }
}
