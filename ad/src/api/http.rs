//! HTTP implementation of the orchestrator client
//!
//! Plain JSON over HTTP. Any non-2xx status is a failure and the body is only
//! kept as an error message, never decoded as data. No retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    ApiEndpoint, ApiError, ChatRequest, ChatResponse, HealthResponse, OrchestratorApi, PlanRequest, PlanResponse,
};

/// Orchestrator client backed by reqwest
pub struct HttpOrchestratorClient {
    endpoint: ApiEndpoint,
    http: Client,
}

impl HttpOrchestratorClient {
    /// Create a client for a resolved endpoint
    ///
    /// `timeout` is opt-in; without it a request that never completes keeps
    /// its turn loading.
    pub fn new(endpoint: ApiEndpoint, timeout: Option<Duration>) -> Result<Self, ApiError> {
        debug!(%endpoint, ?timeout, "HttpOrchestratorClient::new: called");
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Network)?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint.url(path);
        debug!(%url, "post_json: called");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "post_json: network error");
                ApiError::Network(e)
            })?;

        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.endpoint.url(path);
        debug!(%url, "get_json: called");

        let response = self.http.get(&url).send().await.map_err(ApiError::Network)?;

        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "decode: orchestrator returned non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "decode: success");
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl OrchestratorApi for HttpOrchestratorClient {
    async fn request_plan(&self, goal: &str) -> Result<PlanResponse, ApiError> {
        debug!(%goal, "request_plan: called");
        let body = PlanRequest { goal: goal.to_string() };
        self.post_json("plan", &body).await
    }

    async fn send_chat_message(&self, session_id: &str, message: &str) -> Result<ChatResponse, ApiError> {
        debug!(%session_id, message_len = message.len(), "send_chat_message: called");
        let body = ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        };
        self.post_json("chat", &body).await
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        debug!("health: called");
        self.get_json("health").await
    }
}
