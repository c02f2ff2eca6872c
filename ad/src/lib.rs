//! AutoDev - terminal client for the AutoDev multi-agent orchestrator
//!
//! AutoDev asks the orchestrator for an initial execution plan, then relays
//! operator messages to the agent pipeline (navigator, analyzer, architect,
//! coder, devops, validator) and shows each agent's reply.
//!
//! # Modules
//!
//! - [`api`] - Orchestrator transport: `POST /plan`, `POST /chat`, `GET /health`
//! - [`session`] - Session state and the bootstrap/chat-turn controller
//! - [`tui`] - Full-screen chat front end
//! - [`repl`] - Line-mode chat front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod api;
pub mod cli;
pub mod config;
pub mod repl;
pub mod session;
pub mod tui;

pub use api::{ApiEndpoint, ApiError, HttpOrchestratorClient, OrchestratorApi, create_client};
pub use config::Config;
pub use session::{Message, SessionController, SessionState, SubmitRejected};
