//! Terminal User Interface for AutoDev
//!
//! Full-screen chat with the orchestrator:
//! - Execution plan sidebar
//! - Conversation log with per-agent colors
//! - Composer that locks while a turn is in flight

mod app;
mod events;
mod runner;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::{TaskResult, TuiRunner};

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::api::OrchestratorApi;
use crate::config::Config;
use crate::session::SessionController;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;
    Ok(())
}

/// Run the TUI against the given orchestrator
///
/// This is the main entry point for `ad` and `ad tui`.
pub async fn run(config: &Config, api: Arc<dyn OrchestratorApi>) -> Result<()> {
    debug!("tui::run: called");
    let terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let controller = SessionController::new(api, config.session.seed_goal.clone());
    let mut runner = TuiRunner::new(terminal, App::new(controller));
    runner.run().await
}
