//! Orchestrator base-URL resolution
//!
//! The base URL is resolved once at startup and handed to the HTTP client as a
//! value, so tests and alternate front ends can point at any orchestrator.

use tracing::debug;

use super::ApiError;

/// Resolved orchestrator base URL (never ends with a slash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    base: String,
}

impl ApiEndpoint {
    /// Build an endpoint from an explicit base URL
    pub fn new(base: &str) -> Result<Self, ApiError> {
        debug!(%base, "ApiEndpoint::new: called");
        normalize_base_url(base)
            .map(|base| Self { base })
            .ok_or_else(|| ApiError::Config(format!("API base URL '{}' is empty", base)))
    }

    /// Resolve the base URL with priority: configured endpoint > hosting origin
    ///
    /// Blank values count as absent. When neither is available there is no
    /// sensible default for a terminal client, so this fails instead of
    /// guessing a relative path.
    pub fn resolve(configured: Option<&str>, origin: Option<&str>) -> Result<Self, ApiError> {
        debug!(?configured, ?origin, "ApiEndpoint::resolve: called");
        if let Some(base) = configured.and_then(normalize_base_url) {
            debug!(%base, "ApiEndpoint::resolve: using configured endpoint");
            return Ok(Self { base });
        }

        if let Some(base) = origin.and_then(normalize_base_url) {
            debug!(%base, "ApiEndpoint::resolve: falling back to origin");
            return Ok(Self { base });
        }

        debug!("ApiEndpoint::resolve: nothing configured");
        Err(ApiError::Config(
            "API base URL is not configured. Set AUTODEV_API_URL, --api-url, or api.url in the config file."
                .to_string(),
        ))
    }

    /// The normalized base URL
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join a request path onto the base with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, ensure_leading_slash(path))
    }
}

impl std::fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

/// Trim whitespace and trailing slashes; blank input yields `None`
pub fn normalize_base_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Normalize a request path to start with exactly one `/`
pub fn ensure_leading_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
