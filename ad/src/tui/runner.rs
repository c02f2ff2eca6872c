//! TUI Runner - main loop that owns the terminal and the in-flight requests
//!
//! The TuiRunner is responsible for:
//! - Starting the bootstrap once the first frame is up
//! - Dispatching terminal events to App for handling
//! - Running accepted chat turns as background tasks
//! - Applying request outcomes back onto the session, one at a time

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ChatResponse, PlanResponse};
use crate::session::{PendingTurn, SubmitRejected};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// Event poll interval (~30 FPS)
const TICK_RATE: Duration = Duration::from_millis(33);

/// Outcome of a background request
#[derive(Debug)]
pub enum TaskResult {
    Bootstrap(Result<PlanResponse, ApiError>),
    Turn(PendingTurn, Result<ChatResponse, ApiError>),
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    result_tx: mpsc::UnboundedSender<TaskResult>,
    result_rx: mpsc::UnboundedReceiver<TaskResult>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, app: App) -> Self {
        debug!("TuiRunner::new: called");
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            app,
            terminal,
            event_handler: EventHandler::new(TICK_RATE),
            result_tx,
            result_rx,
        }
    }

    /// Run until the operator quits
    pub async fn run(&mut self) -> Result<()> {
        info!("TUI started");
        self.draw()?;
        self.start_bootstrap();

        loop {
            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                break;
                            }
                        }
                        Event::Paste(text) => self.app.handle_paste(&text),
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: resize");
                        }
                        Event::Tick => self.app.on_tick(),
                    }
                    if self.app.take_pending_submit() {
                        self.start_turn();
                    }
                }
                Some(result) = self.result_rx.recv() => {
                    apply_result(&mut self.app, result);
                }
            }

            if self.app.should_quit() {
                break;
            }
            self.draw()?;
        }

        info!("TUI exiting");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal.draw(|frame| views::render(app, frame))?;
        Ok(())
    }

    fn start_bootstrap(&mut self) {
        let Some(request) = self.app.controller_mut().begin_bootstrap() else {
            return;
        };
        debug!(goal = request.goal(), "start_bootstrap: spawning plan request");
        let api = self.app.controller().api();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let outcome = request.dispatch(api.as_ref()).await;
            if tx.send(TaskResult::Bootstrap(outcome)).is_err() {
                debug!("start_bootstrap: runner gone, dropping outcome");
            }
        });
    }

    fn start_turn(&mut self) {
        let text = self.app.state().pending_input.clone();
        let turn = match self.app.controller_mut().begin_submit(&text) {
            Ok(turn) => turn,
            Err(SubmitRejected::Busy) => {
                warn!("start_turn: a turn is already in flight");
                return;
            }
            Err(rejected) => {
                debug!(%rejected, "start_turn: submit rejected");
                return;
            }
        };
        debug!(turn = turn.id(), "start_turn: spawning chat request");
        let api = self.app.controller().api();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let outcome = turn.dispatch(api.as_ref()).await;
            if tx.send(TaskResult::Turn(turn, outcome)).is_err() {
                debug!("start_turn: runner gone, dropping outcome");
            }
        });
    }
}

/// Apply a finished request to the session
fn apply_result(app: &mut App, result: TaskResult) {
    match result {
        TaskResult::Bootstrap(outcome) => app.controller_mut().finish_bootstrap(outcome),
        TaskResult::Turn(turn, outcome) => app.controller_mut().finish_submit(turn, outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AgentResult;
    use crate::api::client::mock::MockOrchestrator;
    use crate::session::{CHAT_FAILURE, SessionController};
    use std::sync::Arc;

    fn plan() -> PlanResponse {
        PlanResponse {
            session_id: "s1".to_string(),
            goal: "g".to_string(),
            plan: vec!["step".to_string()],
        }
    }

    #[test]
    fn test_apply_bootstrap_then_turn() {
        let mut app = App::new(SessionController::new(Arc::new(MockOrchestrator::new()), "g"));
        let _ = app.controller_mut().begin_bootstrap();
        apply_result(&mut app, TaskResult::Bootstrap(Ok(plan())));
        assert!(app.state().has_session());

        let turn = app.controller_mut().begin_submit("hello").unwrap();
        let response = ChatResponse {
            session_id: "s1".to_string(),
            history: vec![],
            results: vec![AgentResult::new("Coder", "done")],
        };
        apply_result(&mut app, TaskResult::Turn(turn, Ok(response)));

        let state = app.state();
        assert!(!state.loading);
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[2].author, "Coder");
    }

    #[test]
    fn test_apply_failed_turn() {
        let mut app = App::new(SessionController::new(Arc::new(MockOrchestrator::new()), "g"));
        let _ = app.controller_mut().begin_bootstrap();
        apply_result(&mut app, TaskResult::Bootstrap(Ok(plan())));

        let turn = app.controller_mut().begin_submit("hello").unwrap();
        apply_result(
            &mut app,
            TaskResult::Turn(turn, Err(ApiError::InvalidResponse("down".to_string()))),
        );
        assert_eq!(app.state().error.as_deref(), Some(CHAT_FAILURE));
        assert!(!app.state().loading);
    }
}
