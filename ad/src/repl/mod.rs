//! Line-mode REPL for AutoDev
//!
//! Plain-terminal front end over the same [`SessionController`] the TUI drives.

mod session;

pub use session::ReplSession;

use std::sync::Arc;

use eyre::Result;

use crate::api::OrchestratorApi;
use crate::config::Config;
use crate::session::SessionController;

/// Run the interactive REPL
///
/// This is the main entry point for `ad repl`.
pub async fn run_interactive(config: &Config, api: Arc<dyn OrchestratorApi>) -> Result<()> {
    let controller = SessionController::new(api, config.session.seed_goal.clone());
    let mut session = ReplSession::new(controller);
    session.run().await
}

/// Numbered plan steps, one per line
pub fn format_plan(plan: &[String]) -> String {
    plan.iter()
        .enumerate()
        .map(|(i, step)| format!("  {}. {}\n", i + 1, step))
        .collect()
}
