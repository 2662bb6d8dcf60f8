use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone};
use common::model::game::{resolve, Move, Outcome};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    export::{self, HistoryExport},
    model::{GameRecord, Mode, Status, Tally},
    scoring::{HttpScoringClient, ScoringError, ScoringService},
    strategy::{RandomMove, Strategy},
};

pub const FAILURE_MESSAGE: &str = "Error: Something went wrong! Please try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Scoring service unavailable: {0}")]
    TransientRemoteFailure(String),

    #[error("Scoring service sent an unusable response: {0}")]
    MalformedRemoteOutcome(String),

    #[error("A move is already being resolved")]
    Busy,

    #[error("Result discarded: the session was reset while the move was in flight")]
    Superseded,
}

impl From<ScoringError> for SessionError {
    fn from(error: ScoringError) -> Self {
        match error {
            ScoringError::Network(_) | ScoringError::Status(_) => {
                SessionError::TransientRemoteFailure(error.to_string())
            }
            ScoringError::Decode(_) => SessionError::MalformedRemoteOutcome(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutcomePolicy {
    // Recorded as a tie and counted in `fallback_ties`.
    #[default]
    FallbackToTie,
    Strict,
}

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub epoch: u64,
    pub choice: Move,
}

struct SessionState {
    mode: Mode,
    epoch: u64,
    tally: Tally,
    history: Vec<GameRecord>,
    in_flight: Option<u64>,
    last_ticket: u64,
    status: Status,
    fallback_ties: u32,
    strategy: Box<dyn Strategy>,
}

impl SessionState {
    fn apply(&mut self, epoch: u64, record: GameRecord) -> Result<GameRecord, SessionError> {
        if epoch != self.epoch {
            warn!(
                "Dropping result from epoch {} (current epoch {}): {:?}",
                epoch, self.epoch, record
            );
            return Err(SessionError::Superseded);
        }
        self.history.push(record);
        self.tally.record(record.outcome);
        self.status = Status::Played(record);
        Ok(record)
    }
}

struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        // A mode switch may already have released this ticket and a newer one taken its place.
        if state.in_flight == Some(self.ticket) {
            state.in_flight = None;
        }
    }
}

pub struct GameSession {
    state: Mutex<SessionState>,
    scoring: Arc<dyn ScoringService>,
    policy: OutcomePolicy,
}

impl GameSession {
    pub fn new(scoring: Arc<dyn ScoringService>) -> Self {
        GameSession {
            state: Mutex::new(SessionState {
                mode: Mode::default(),
                epoch: 0,
                tally: Tally::default(),
                history: Vec::new(),
                in_flight: None,
                last_ticket: 0,
                status: Status::Idle,
                fallback_ties: 0,
                strategy: Box::new(RandomMove::from_entropy()),
            }),
            scoring,
            policy: OutcomePolicy::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ScoringError> {
        let scoring = HttpScoringClient::new(config.scoring_url.clone(), config.request_timeout)?;
        Ok(GameSession::new(Arc::new(scoring))
            .with_mode(config.mode)
            .with_policy(config.outcome_policy))
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        self.lock().mode = mode;
        self
    }

    pub fn with_strategy(self, strategy: impl Strategy + 'static) -> Self {
        self.lock().strategy = Box::new(strategy);
        self
    }

    pub fn with_policy(mut self, policy: OutcomePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Captures the current epoch, so a move queued before a mode switch is never scored after it.
    pub fn pending(&self, choice: Move) -> PendingMove {
        PendingMove {
            epoch: self.epoch(),
            choice,
        }
    }

    pub async fn submit_pending(&self, pending: PendingMove) -> Result<GameRecord, SessionError> {
        self.submit(pending.choice, Some(pending.epoch)).await
    }

    pub async fn submit_move(&self, choice: Move) -> Result<GameRecord, SessionError> {
        self.submit(choice, None).await
    }

    async fn submit(
        &self,
        choice: Move,
        queued_in: Option<u64>,
    ) -> Result<GameRecord, SessionError> {
        let (ticket, epoch, mode) = {
            let mut state = self.lock();
            if let Some(queued_in) = queued_in.filter(|queued_in| *queued_in != state.epoch) {
                debug!(
                    "Dropping {:?} queued in epoch {} (current epoch {})",
                    choice, queued_in, state.epoch
                );
                return Err(SessionError::Superseded);
            }
            if state.in_flight.is_some() {
                debug!("Rejecting {:?}, a move is already in flight", choice);
                return Err(SessionError::Busy);
            }
            state.last_ticket += 1;
            let ticket = state.last_ticket;
            state.in_flight = Some(ticket);
            (ticket, state.epoch, state.mode)
        };
        let _in_flight = InFlight {
            state: &self.state,
            ticket,
        };
        debug!("Dispatching {:?} in {} mode (epoch {})", choice, mode, epoch);

        let result = match mode {
            Mode::Random => self.resolve_locally(epoch, choice),
            Mode::Remote => self.resolve_remotely(epoch, choice).await,
        };

        if let Err(
            error @ (SessionError::TransientRemoteFailure(_)
            | SessionError::MalformedRemoteOutcome(_)),
        ) = &result
        {
            let mut state = self.lock();
            if state.epoch != epoch {
                debug!("Dropping failure from epoch {}: {}", epoch, error);
                drop(state);
                return Err(SessionError::Superseded);
            }
            warn!("Round failed: {}", error);
            state.status = Status::Failed(FAILURE_MESSAGE.to_owned());
        }
        result
    }

    fn resolve_locally(&self, epoch: u64, choice: Move) -> Result<GameRecord, SessionError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let opponent_move = state.strategy.make_move(&state.history);
        state.apply(
            epoch,
            GameRecord {
                player_move: choice,
                opponent_move,
                outcome: resolve(choice, opponent_move),
                was_random: true,
            },
        )
    }

    async fn resolve_remotely(&self, epoch: u64, choice: Move) -> Result<GameRecord, SessionError> {
        let response = self.scoring.play(choice).await?;

        let (outcome, fallback) = match response.outcome() {
            Some(outcome) => {
                if outcome != resolve(choice, response.computer_choice) {
                    warn!(
                        "Scoring service says {:?} for {} against {}",
                        response.result, choice, response.computer_choice
                    );
                }
                (outcome, false)
            }
            None => match self.policy {
                OutcomePolicy::FallbackToTie => {
                    warn!(
                        "Unrecognized result phrase {:?}, recording a fallback tie",
                        response.result
                    );
                    (Outcome::Tie, true)
                }
                OutcomePolicy::Strict => {
                    return Err(SessionError::MalformedRemoteOutcome(format!(
                        "unrecognized result phrase {:?}",
                        response.result
                    )));
                }
            },
        };

        let mut state = self.lock();
        let record = state.apply(
            epoch,
            GameRecord {
                player_move: choice,
                opponent_move: response.computer_choice,
                outcome,
                was_random: false,
            },
        )?;
        if fallback {
            state.fallback_ties += 1;
        }
        Ok(record)
    }

    pub fn switch_prompt(mode: Mode) -> String {
        format!(
            "Switch to {} mode? This clears the scoreboard and the game history.",
            mode
        )
    }

    pub fn set_mode(&self, mode: Mode, confirm: &dyn Confirm) -> bool {
        if self.mode() == mode {
            return false;
        }
        if !confirm.confirm(&Self::switch_prompt(mode)) {
            info!("Switch to {} mode declined", mode);
            return false;
        }

        let mut state = self.lock();
        if state.mode == mode {
            return false;
        }
        state.mode = mode;
        state.epoch += 1;
        state.tally = Tally::default();
        state.history.clear();
        state.in_flight = None;
        state.status = Status::Idle;
        state.fallback_ties = 0;
        info!("Switched to {} mode, epoch {}", mode, state.epoch);
        true
    }

    pub fn mode(&self) -> Mode {
        self.lock().mode
    }

    pub fn tally(&self) -> Tally {
        self.lock().tally
    }

    pub fn history(&self) -> Vec<GameRecord> {
        self.lock().history.clone()
    }

    pub fn status(&self) -> Status {
        self.lock().status.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    pub fn is_busy(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    pub fn fallback_ties(&self) -> u32 {
        self.lock().fallback_ties
    }

    pub fn export_history(&self) -> String {
        export::to_csv(&self.lock().history)
    }

    pub fn export<Tz: TimeZone>(&self, exported_at: &DateTime<Tz>) -> HistoryExport
    where
        Tz::Offset: std::fmt::Display,
    {
        HistoryExport::new(&self.lock().history, exported_at)
    }
}
