//! Session state
//!
//! Pure data. Renderers read it; only [`super::SessionController`] writes it.

use serde::Serialize;

use crate::api::AgentResult;

/// Author name used for the operator's own messages
pub const USER_AUTHOR: &str = "You";

/// Author name used for the synthetic bootstrap notice
pub const PLANNER_AUTHOR: &str = "Planner";

/// Error shown when the initial plan could not be fetched
pub const BOOTSTRAP_FAILURE: &str = "Failed to fetch initial plan";

/// Error shown when a chat turn could not be completed
pub const CHAT_FAILURE: &str = "Unable to contact orchestrator API";

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub author: String,
    pub content: String,
}

impl Message {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }

    /// A message typed by the operator
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(USER_AUTHOR, content)
    }

    /// The notice appended once the initial plan arrives
    pub fn plan_created(goal: &str) -> Self {
        Self::new(PLANNER_AUTHOR, format!("Initial plan created for goal: {}", goal))
    }

    pub fn is_user(&self) -> bool {
        self.author == USER_AUTHOR
    }
}

impl From<AgentResult> for Message {
    fn from(result: AgentResult) -> Self {
        Self::new(result.agent, result.content)
    }
}

/// Everything an interface layer needs to draw the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Server-assigned id; `None` until bootstrap succeeds
    pub session_id: Option<String>,
    /// Goal echoed back by the bootstrap response
    pub goal: Option<String>,
    /// Plan steps in execution order
    pub plan: Vec<String>,
    /// Append-only conversation log
    pub messages: Vec<Message>,
    /// Text typed but not yet submitted
    pub pending_input: String,
    /// True while a chat request is in flight
    pub loading: bool,
    /// Latest failure, if any
    pub error: Option<String>,
}

impl SessionState {
    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    /// Whether a submit of the pending input would be accepted right now
    pub fn can_submit(&self) -> bool {
        self.has_session() && !self.loading && !self.pending_input.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("hi"), Message::new("You", "hi"));
        assert!(Message::user("hi").is_user());
        assert_eq!(
            Message::plan_created("Bootstrap AutoDev project"),
            Message::new("Planner", "Initial plan created for goal: Bootstrap AutoDev project")
        );
        assert!(!Message::plan_created("g").is_user());
    }

    #[test]
    fn test_message_from_agent_result_drops_metadata() {
        let mut result = AgentResult::new("Coder", "done");
        result.metadata = Some(serde_json::Map::new());
        assert_eq!(Message::from(result), Message::new("Coder", "done"));
    }

    #[test]
    fn test_can_submit() {
        let mut state = SessionState::default();
        state.pending_input = "go".to_string();
        assert!(!state.can_submit());

        state.session_id = Some("s1".to_string());
        assert!(state.can_submit());

        state.loading = true;
        assert!(!state.can_submit());

        state.loading = false;
        state.pending_input = " \n\t".to_string();
        assert!(!state.can_submit());
    }
}
