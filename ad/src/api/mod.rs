//! Orchestrator transport client
//!
//! Stateless request/response calls against the AutoDev orchestrator plus the
//! base-URL policy used to reach it.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub mod client;
mod endpoint;
mod error;
mod http;
mod types;

pub use client::OrchestratorApi;
pub use endpoint::{ApiEndpoint, ensure_leading_slash, normalize_base_url};
pub use error::ApiError;
pub use http::HttpOrchestratorClient;
pub use types::{
    AgentResult, ChatRequest, ChatResponse, HealthResponse, HistoryItem, PlanRequest, PlanResponse,
};

use crate::config::ApiConfig;

/// Create an orchestrator client from config
///
/// `override_url` (from the command line or environment) wins over the
/// configured `api.url`; `api.origin` is the last resort.
pub fn create_client(config: &ApiConfig, override_url: Option<&str>) -> Result<Arc<dyn OrchestratorApi>, ApiError> {
    debug!(?override_url, ?config, "create_client: called");
    let configured = override_url
        .filter(|url| !url.trim().is_empty())
        .or(config.url.as_deref());
    let endpoint = ApiEndpoint::resolve(configured, config.origin.as_deref())?;
    let timeout = config.timeout_ms.map(Duration::from_millis);

    Ok(Arc::new(HttpOrchestratorClient::new(endpoint, timeout)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_without_any_endpoint_fails_fast() {
        let config = ApiConfig::default();
        let err = create_client(&config, None).err().unwrap();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_create_client_override_wins() {
        let config = ApiConfig {
            url: Some("   ".to_string()),
            origin: None,
            timeout_ms: None,
        };
        assert!(create_client(&config, Some("http://localhost:8000")).is_ok());
        assert!(create_client(&config, None).is_err());
    }
}
