//! Wire types for the orchestrator's `/plan`, `/chat` and `/health` endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
}

/// Successful answer to `POST /plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub session_id: String,
    pub goal: String,
    pub plan: Vec<String>,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// One agent's contribution to a chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AgentResult {
    pub fn new(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            content: content.into(),
            metadata: None,
        }
    }
}

/// Entry of the backend's own conversation history
///
/// The orchestrator has shipped both `{role, content}` objects and bare
/// message strings here, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryItem {
    Entry { role: String, content: String },
    Text(String),
}

impl HistoryItem {
    pub fn content(&self) -> &str {
        match self {
            Self::Entry { content, .. } => content,
            Self::Text(text) => text,
        }
    }
}

/// Successful answer to `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    pub results: Vec<AgentResult>,
}

/// Answer to `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
