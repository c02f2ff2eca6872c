//! OrchestratorApi trait definition

use async_trait::async_trait;

use super::{ApiError, ChatResponse, HealthResponse, PlanResponse};

/// Stateless orchestrator client - each call is an independent request
///
/// Implementations hold nothing but a resolved endpoint and a connection
/// pool. Session identity lives with the caller and is passed explicitly.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Ask the orchestrator to create a plan (and a session) for a goal
    async fn request_plan(&self, goal: &str) -> Result<PlanResponse, ApiError>;

    /// Send one chat turn for an existing session
    async fn send_chat_message(&self, session_id: &str, message: &str) -> Result<ChatResponse, ApiError>;

    /// Probe orchestrator liveness
    async fn health(&self) -> Result<HealthResponse, ApiError>;
}
