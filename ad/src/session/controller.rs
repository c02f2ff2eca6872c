//! Session controller
//!
//! Owns the [`SessionState`] and runs the two request/response cycles against
//! the orchestrator: the one-time bootstrap and the per-turn chat.
//!
//! Each cycle is split into a synchronous `begin_*` step, the transport call,
//! and a synchronous `finish_*` step. Drivers that can block (the REPL, tests)
//! use the `async` helpers that chain all three; the TUI runs the transport
//! call on a spawned task and hands the outcome back to `finish_*`. Either way
//! all state changes happen in `begin_*`/`finish_*`, and `begin_submit` refuses
//! to start a turn while another one is loading, so turn batches can't interleave.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::state::{BOOTSTRAP_FAILURE, CHAT_FAILURE, Message, SessionState};
use crate::api::{ApiError, ChatResponse, OrchestratorApi, PlanResponse};

/// Why a submission was refused (state is untouched in every case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("no session has been established")]
    NoSession,
    #[error("a turn is already in flight")]
    Busy,
    #[error("message is blank")]
    BlankInput,
}

/// Ticket for the one bootstrap request of a run
#[derive(Debug)]
pub struct BootstrapRequest {
    goal: String,
}

impl BootstrapRequest {
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Issue the plan request
    pub async fn dispatch(&self, api: &dyn OrchestratorApi) -> Result<PlanResponse, ApiError> {
        debug!(goal = %self.goal, "BootstrapRequest::dispatch: called");
        api.request_plan(&self.goal).await
    }
}

/// Ticket for a chat turn that has been started but not finished
#[derive(Debug)]
pub struct PendingTurn {
    id: u64,
    session_id: String,
    message: String,
}

impl PendingTurn {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Issue the chat request
    pub async fn dispatch(&self, api: &dyn OrchestratorApi) -> Result<ChatResponse, ApiError> {
        debug!(turn = self.id, session_id = %self.session_id, "PendingTurn::dispatch: called");
        api.send_chat_message(&self.session_id, &self.message).await
    }
}

/// Explicit state container for one chat session with the orchestrator
pub struct SessionController {
    api: Arc<dyn OrchestratorApi>,
    seed_goal: String,
    state: SessionState,
    bootstrap_started: bool,
    in_flight: Option<u64>,
    next_turn_id: u64,
}

impl SessionController {
    pub fn new(api: Arc<dyn OrchestratorApi>, seed_goal: impl Into<String>) -> Self {
        let seed_goal = seed_goal.into();
        debug!(%seed_goal, "SessionController::new: called");
        Self {
            api,
            seed_goal,
            state: SessionState::default(),
            bootstrap_started: false,
            in_flight: None,
            next_turn_id: 0,
        }
    }

    /// Current state, for renderers
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// Transport used for requests, for drivers that dispatch tickets themselves
    pub fn api(&self) -> Arc<dyn OrchestratorApi> {
        Arc::clone(&self.api)
    }

    pub fn seed_goal(&self) -> &str {
        &self.seed_goal
    }

    /// Replace the not-yet-submitted input text
    pub fn update_pending_input(&mut self, text: impl Into<String>) {
        self.state.pending_input = text.into();
    }

    // === Bootstrap ===

    /// Start the bootstrap; returns `None` if it was already started this run
    pub fn begin_bootstrap(&mut self) -> Option<BootstrapRequest> {
        debug!(started = self.bootstrap_started, "begin_bootstrap: called");
        if self.bootstrap_started {
            debug!("begin_bootstrap: already started, ignoring");
            return None;
        }
        self.bootstrap_started = true;
        info!("Requesting initial plan for goal: {}", self.seed_goal);
        Some(BootstrapRequest {
            goal: self.seed_goal.clone(),
        })
    }

    /// Apply the outcome of the plan request
    pub fn finish_bootstrap(&mut self, outcome: Result<PlanResponse, ApiError>) {
        debug!(ok = outcome.is_ok(), "finish_bootstrap: called");
        if self.state.has_session() {
            warn!("finish_bootstrap: session already established, ignoring outcome");
            return;
        }

        let outcome = outcome.and_then(|plan| {
            if plan.session_id.trim().is_empty() {
                Err(ApiError::InvalidResponse("plan response carried an empty session_id".to_string()))
            } else {
                Ok(plan)
            }
        });

        match outcome {
            Ok(plan) => {
                info!(
                    "Session {} established with {} plan step(s)",
                    plan.session_id,
                    plan.plan.len()
                );
                self.state.messages.push(Message::plan_created(&plan.goal));
                self.state.session_id = Some(plan.session_id);
                self.state.goal = Some(plan.goal);
                self.state.plan = plan.plan;
            }
            Err(e) => {
                warn!("Bootstrap failed: {}", e);
                self.state.error = Some(BOOTSTRAP_FAILURE.to_string());
            }
        }
    }

    /// Run the bootstrap to completion (no-op after the first call)
    pub async fn bootstrap(&mut self) {
        debug!("bootstrap: called");
        if let Some(request) = self.begin_bootstrap() {
            let outcome = request.dispatch(self.api.as_ref()).await;
            self.finish_bootstrap(outcome);
        }
    }

    // === Chat turns ===

    /// Start a chat turn
    ///
    /// On acceptance the operator's message is already in the log when this
    /// returns, before any request is issued.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingTurn, SubmitRejected> {
        debug!(text_len = text.len(), loading = self.state.loading, "begin_submit: called");
        let session_id = match &self.state.session_id {
            Some(id) => id.clone(),
            None => {
                debug!("begin_submit: no session");
                return Err(SubmitRejected::NoSession);
            }
        };
        if self.state.loading || self.in_flight.is_some() {
            debug!("begin_submit: busy");
            return Err(SubmitRejected::Busy);
        }
        if text.trim().is_empty() {
            debug!("begin_submit: blank input");
            return Err(SubmitRejected::BlankInput);
        }

        let id = self.next_turn_id;
        self.next_turn_id += 1;
        self.in_flight = Some(id);

        self.state.loading = true;
        self.state.error = None;
        self.state.messages.push(Message::user(text));

        info!("Turn {} started ({} chars)", id, text.len());
        Ok(PendingTurn {
            id,
            session_id,
            message: text.to_string(),
        })
    }

    /// Apply the outcome of a chat request and close the turn
    pub fn finish_submit(&mut self, turn: PendingTurn, outcome: Result<ChatResponse, ApiError>) {
        debug!(turn = turn.id, ok = outcome.is_ok(), "finish_submit: called");
        if self.in_flight != Some(turn.id) {
            warn!(turn = turn.id, in_flight = ?self.in_flight, "finish_submit: stale turn, ignoring");
            return;
        }

        match outcome {
            Ok(response) => {
                info!(
                    "Turn {} completed with {} agent result(s), backend history has {} item(s)",
                    turn.id,
                    response.results.len(),
                    response.history.len()
                );
                self.state
                    .messages
                    .extend(response.results.into_iter().map(Message::from));
            }
            Err(e) => {
                warn!("Turn {} failed: {}", turn.id, e);
                self.state.error = Some(CHAT_FAILURE.to_string());
            }
        }

        self.state.pending_input.clear();
        self.state.loading = false;
        self.in_flight = None;
    }

    /// Run a chat turn for `text` to completion
    pub async fn submit(&mut self, text: &str) -> Result<(), SubmitRejected> {
        debug!("submit: called");
        let turn = self.begin_submit(text)?;
        let outcome = turn.dispatch(self.api.as_ref()).await;
        self.finish_submit(turn, outcome);
        Ok(())
    }

    /// Run a chat turn for the current pending input
    pub async fn submit_pending(&mut self) -> Result<(), SubmitRejected> {
        debug!("submit_pending: called");
        let text = self.state.pending_input.clone();
        self.submit(&text).await
    }
}
