//! Client-side session with the orchestrator
//!
//! - [`SessionState`] - session id, plan, message log, input buffer, flags
//! - [`SessionController`] - bootstrap and chat-turn state machine over it

mod controller;
mod state;

pub use controller::{BootstrapRequest, PendingTurn, SessionController, SubmitRejected};
pub use state::{BOOTSTRAP_FAILURE, CHAT_FAILURE, Message, PLANNER_AUTHOR, SessionState, USER_AUTHOR};
