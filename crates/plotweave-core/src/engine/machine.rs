//! The narrative state machine
//!
//! Owns the one active session, enforces the at-most-one-turn-in-flight
//! invariant, reconciles backend replies into committed state, and persists
//! every commit. State lives behind a mutex that is never held across an
//! await; the network and store calls happen between lock scopes.

use crate::client::{GenerationRequest, NarrativeReply};
use crate::config::LlmSettings;
use crate::engine::backend::NarrativeBackend;
use crate::engine::scenario;
use crate::error::{EngineError, EngineResult};
use crate::reconcile;
use crate::session::{ChatEntry, Role, Session, SessionStore};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Session-level phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session; the scenario picker is showing
    Unselected,
    /// Scenario chosen, opening turn not yet committed
    AwaitingFirstTurn,
    /// Normal play
    Active,
}

/// Turn-level phase: the explicit two-phase commit tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnPhase {
    Idle,
    Pending(Uuid),
}

/// Outcome of one `submit_action` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    /// Reply merged, history appended, session persisted
    Committed,
    /// Backend failed; only the display log changed
    Faulted,
    /// A turn was already in flight; the submission was dropped
    RejectedBusy,
    /// The trimmed action text was empty
    RejectedEmpty,
    /// The session was reset while the turn was in flight; reply dropped
    Superseded,
}

/// Blocking yes/no confirmation, used only for reset
pub trait ResetConfirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

struct EngineState {
    phase: Phase,
    session: Option<Session>,
    turn: TurnPhase,
    /// Bumped on every reset; a pending turn whose captured value no longer
    /// matches is dropped instead of applied
    generation: u64,
}

/// The turn-based narrative session engine
pub struct NarrativeEngine {
    state: Mutex<EngineState>,
    backend: Arc<dyn NarrativeBackend>,
    store: Arc<dyn SessionStore>,
    settings: LlmSettings,
}

impl NarrativeEngine {
    /// Create an engine in the `Unselected` phase
    pub fn new(
        backend: Arc<dyn NarrativeBackend>,
        store: Arc<dyn SessionStore>,
        settings: LlmSettings,
    ) -> Self {
        Self {
            state: Mutex::new(EngineState {
                phase: Phase::Unselected,
                session: None,
                turn: TurnPhase::Idle,
                generation: 0,
            }),
            backend,
            store,
            settings,
        }
    }

    /// Load the persisted slot, if any. A missing or corrupt slot leaves the
    /// engine `Unselected`.
    pub async fn mount(&self) -> EngineResult<()> {
        let loaded = self.store.load().await?;
        let mut state = self.state.lock();
        match loaded {
            Some(session) => {
                info!(scenario = %session.scenario_id, "resuming persisted session");
                state.session = Some(session);
                state.phase = Phase::Active;
            }
            None => {
                debug!("no persisted session, starting unselected");
                state.phase = Phase::Unselected;
            }
        }
        Ok(())
    }

    /// Current session phase
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Whether a turn is currently in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.state.lock().turn, TurnPhase::Pending(_))
    }

    /// Snapshot of the current session, if one is active
    pub fn session(&self) -> Option<Session> {
        self.state.lock().session.clone()
    }

    /// Snapshot of the display log
    pub fn display_log(&self) -> Vec<ChatEntry> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.display_log.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the suggested choices for the next action
    pub fn pending_choices(&self) -> Vec<String> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.pending_choices.clone())
            .unwrap_or_default()
    }

    /// Start a new adventure in the given scenario and auto-submit its
    /// opening action. Valid only while `Unselected`.
    pub async fn start_scenario(&self, scenario_id: &str) -> EngineResult<TurnStatus> {
        let scenario = scenario::find(scenario_id)
            .ok_or_else(|| EngineError::invalid_input(format!("unknown scenario: {scenario_id}")))?;

        {
            let mut state = self.state.lock();
            if state.phase != Phase::Unselected {
                return Err(EngineError::invalid_input("a session is already active"));
            }
            state.session = Some(scenario.new_session());
            state.phase = Phase::AwaitingFirstTurn;
        }

        info!(scenario = scenario.id, "adventure started");
        self.submit_action(&scenario.opening_action()).await
    }

    /// Submit one player action.
    ///
    /// Rejected (as a no-op) while a turn is in flight or when the trimmed
    /// action is empty. Backend failures never propagate as errors: they are
    /// committed to the display log and reported as `TurnStatus::Faulted`.
    pub async fn submit_action(&self, action: &str) -> EngineResult<TurnStatus> {
        let action = action.trim().to_string();

        let (request, token, turn_id) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.phase == Phase::Unselected {
                return Err(EngineError::invalid_input("no active session"));
            }
            if matches!(state.turn, TurnPhase::Pending(_)) {
                debug!("turn already in flight, dropping submission");
                return Ok(TurnStatus::RejectedBusy);
            }
            if action.is_empty() {
                return Ok(TurnStatus::RejectedEmpty);
            }

            let token = state.generation;
            let turn_id = Uuid::new_v4();
            let Some(session) = state.session.as_mut() else {
                return Err(EngineError::invalid_input("no active session"));
            };

            // Optimistic: the player action and an empty pending entry show
            // up before the backend answers
            session.display_log.push(ChatEntry::user(action.as_str()));
            session.display_log.push(ChatEntry::assistant(""));

            let request = GenerationRequest::from_session(session, &action, &self.settings);
            state.turn = TurnPhase::Pending(turn_id);
            (request, token, turn_id)
        };

        debug!(%turn_id, action = %request.action, "turn submitted");
        let outcome = self.backend.narrate(&request).await;
        self.apply_outcome(token, turn_id, &request.action, outcome).await
    }

    /// Second phase of the commit: applied only if the session generation
    /// still matches the one the turn was submitted against.
    async fn apply_outcome(
        &self,
        token: u64,
        turn_id: Uuid,
        action: &str,
        outcome: EngineResult<NarrativeReply>,
    ) -> EngineResult<TurnStatus> {
        let (snapshot, status) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.generation != token {
                warn!(%turn_id, "dropping reply for a superseded session");
                return Ok(TurnStatus::Superseded);
            }
            state.turn = TurnPhase::Idle;
            let Some(session) = state.session.as_mut() else {
                warn!(%turn_id, "session vanished mid-turn, dropping reply");
                return Ok(TurnStatus::Superseded);
            };

            match outcome {
                Ok(reply) => {
                    reconcile::apply_state_update(session, &reply.state_update);
                    session.push_turn(action, &reply.plot);
                    finalize_pending_entry(session, &reply.plot);
                    session.pending_choices = reply.choices;
                    session.touch();
                    state.phase = Phase::Active;
                    debug!(%turn_id, "turn committed");
                    (session.clone(), TurnStatus::Committed)
                }
                Err(error) => {
                    // Stats and canonical history stay untouched; only the
                    // display log records the failure
                    warn!(%turn_id, %error, "turn failed");
                    finalize_pending_entry(session, &format!("[系统错误] {error}"));
                    session.touch();
                    state.phase = Phase::Active;
                    (session.clone(), TurnStatus::Faulted)
                }
            }
        };

        if let Err(error) = self.store.save(&snapshot).await {
            warn!(%error, "failed to persist session, in-memory state kept");
        }
        Ok(status)
    }

    /// Reset the adventure. Asks `confirm` first; denial changes nothing.
    /// Returns whether the reset happened.
    pub async fn reset(&self, confirm: &dyn ResetConfirm) -> EngineResult<bool> {
        if !confirm.confirm("确定要删除当前存档并重开吗？此操作无法撤销。") {
            debug!("reset denied");
            return Ok(false);
        }

        {
            let mut state = self.state.lock();
            state.session = None;
            state.phase = Phase::Unselected;
            state.turn = TurnPhase::Idle;
            state.generation += 1;
        }

        self.store.clear().await?;
        info!("session reset");
        Ok(true)
    }
}

/// Fill in the optimistic assistant placeholder appended at submit time
fn finalize_pending_entry(session: &mut Session, content: &str) {
    match session.display_log.last_mut() {
        Some(entry) if entry.role == Role::Assistant => entry.content = content.to_string(),
        _ => session.display_log.push(ChatEntry::assistant(content)),
    }
}
