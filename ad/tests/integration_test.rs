//! Integration tests for AutoDev
//!
//! These tests drive the session controller over real HTTP against a mock
//! orchestrator.

use std::sync::Arc;

use autodev::api::{ApiEndpoint, HttpOrchestratorClient};
use autodev::config::DEFAULT_SEED_GOAL;
use autodev::session::{BOOTSTRAP_FAILURE, CHAT_FAILURE, PLANNER_AUTHOR, SessionController, SubmitRejected, USER_AUTHOR};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller_for(server: &MockServer) -> SessionController {
    let endpoint = ApiEndpoint::new(&format!("{}/", server.uri())).expect("endpoint");
    let client = HttpOrchestratorClient::new(endpoint, None).expect("client");
    SessionController::new(Arc::new(client), DEFAULT_SEED_GOAL)
}

async fn mount_plan(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/plan"))
        .and(body_json(json!({ "goal": DEFAULT_SEED_GOAL })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "goal": DEFAULT_SEED_GOAL,
            "plan": ["Analyze repository", "Implement feature", "Deploy"]
        })))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn test_bootstrap_establishes_session() {
    let server = MockServer::start().await;
    mount_plan(&server).await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;
    // A second bootstrap in the same run is a no-op (expect(1) above)
    controller.bootstrap().await;

    let state = controller.state();
    assert_eq!(state.session_id.as_deref(), Some("abc123"));
    assert_eq!(state.plan.len(), 3);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].author, PLANNER_AUTHOR);
    assert_eq!(
        state.messages[0].content,
        format!("Initial plan created for goal: {}", DEFAULT_SEED_GOAL)
    );
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_bootstrap_failure_blocks_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/plan"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;

    assert!(controller.state().session_id.is_none());
    assert_eq!(controller.state().error.as_deref(), Some(BOOTSTRAP_FAILURE));
    assert!(controller.state().messages.is_empty());

    controller.update_pending_input("hello");
    assert_eq!(controller.submit_pending().await, Err(SubmitRejected::NoSession));
    assert_eq!(controller.state().pending_input, "hello");
}

// =============================================================================
// Chat turns
// =============================================================================

#[tokio::test]
async fn test_chat_turn_appends_agent_results_in_order() {
    let server = MockServer::start().await;
    mount_plan(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "session_id": "abc123", "message": "Add a health endpoint" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "history": [
                { "role": "user", "content": "Add a health endpoint" },
                "navigator: routed"
            ],
            "results": [
                { "agent": "Navigator", "content": "Routing to analyzer" },
                { "agent": "Coder", "content": "Added GET /health", "metadata": { "files": 1 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;
    controller.update_pending_input("Add a health endpoint");
    controller.submit_pending().await.expect("turn accepted");

    let state = controller.state();
    let authors: Vec<&str> = state.messages.iter().map(|m| m.author.as_str()).collect();
    assert_eq!(authors, vec![PLANNER_AUTHOR, USER_AUTHOR, "Navigator", "Coder"]);
    assert_eq!(state.messages[1].content, "Add a health endpoint");
    assert_eq!(state.messages[3].content, "Added GET /health");
    assert!(state.pending_input.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_chat_failure_keeps_user_message() {
    let server = MockServer::start().await;
    mount_plan(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Session not found" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;
    controller.submit("Deploy it").await.expect("turn accepted");

    let state = controller.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].author, USER_AUTHOR);
    assert_eq!(state.error.as_deref(), Some(CHAT_FAILURE));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_error_clears_on_next_accepted_turn() {
    let server = MockServer::start().await;
    mount_plan(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "history": [],
            "results": [{ "agent": "Validator", "content": "All checks passed" }]
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;

    controller.submit("first").await.expect("turn accepted");
    assert_eq!(controller.state().error.as_deref(), Some(CHAT_FAILURE));

    controller.submit("second").await.expect("turn accepted");
    let state = controller.state();
    assert!(state.error.is_none());
    assert_eq!(state.messages.last().map(|m| m.author.as_str()), Some("Validator"));
}

#[tokio::test]
async fn test_blank_input_issues_no_request() {
    let server = MockServer::start().await;
    mount_plan(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.bootstrap().await;
    controller.update_pending_input("   \n\t");

    assert_eq!(controller.submit_pending().await, Err(SubmitRejected::BlankInput));
    assert_eq!(controller.state().messages.len(), 1);
}
