//! AutoDev client configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api.url`
pub const API_URL_ENV: &str = "AUTODEV_API_URL";

/// Goal sent with the bootstrap plan request
pub const DEFAULT_SEED_GOAL: &str = "Bootstrap AutoDev project";

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Orchestrator connection
    pub api: ApiConfig,

    /// Session bootstrap
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path > `./.autodev.yml` > `~/.config/autodev/autodev.yml` > defaults.
    /// The `AUTODEV_API_URL` environment variable is applied on top.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed here; `load` reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .autodev.yml
        let local_config = PathBuf::from(".autodev.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/autodev/autodev.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("autodev").join("autodev.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the endpoint override taken from the environment
    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(%url, "apply_env: api url from environment");
            self.api.url = Some(url);
        }
    }
}

/// Orchestrator connection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Explicit orchestrator base URL
    pub url: Option<String>,

    /// Origin of the host serving this client, used when `url` is unset
    pub origin: Option<String>,

    /// Per-request timeout in milliseconds (unset = wait indefinitely)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

/// Session bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Goal used for the initial plan request
    #[serde(rename = "seed-goal")]
    pub seed_goal: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_goal: DEFAULT_SEED_GOAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.api.url.is_none());
        assert!(config.api.origin.is_none());
        assert!(config.api.timeout_ms.is_none());
        assert_eq!(config.session.seed_goal, "Bootstrap AutoDev project");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug

api:
  url: http://localhost:8000/
  origin: http://localhost:3000
  timeout-ms: 60000

session:
  seed-goal: Ship the billing service
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.api.url.as_deref(), Some("http://localhost:8000/"));
        assert_eq!(config.api.origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.api.timeout_ms, Some(60000));
        assert_eq!(config.session.seed_goal, "Ship the billing service");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
api:
  url: http://api.internal
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.api.url.as_deref(), Some("http://api.internal"));
        assert!(config.api.timeout_ms.is_none());
        assert_eq!(config.session.seed_goal, DEFAULT_SEED_GOAL);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_apply_env_overrides_url() {
        let mut config = Config::default();
        config.api.url = Some("http://from-file".to_string());

        config.apply_env(Some("http://from-env".to_string()));
        assert_eq!(config.api.url.as_deref(), Some("http://from-env"));

        // Blank env values are ignored
        config.apply_env(Some("  ".to_string()));
        assert_eq!(config.api.url.as_deref(), Some("http://from-env"));

        config.apply_env(None);
        assert_eq!(config.api.url.as_deref(), Some("http://from-env"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log-level: WARN\napi:\n  url: http://explicit:9000").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load_file_chain(Some(&path)).unwrap();
        assert_eq!(config.api.url.as_deref(), Some("http://explicit:9000"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/autodev.yml");
        assert!(Config::load_file_chain(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }
}
