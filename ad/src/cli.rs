//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::API_URL_ENV;

/// AutoDev - chat with the AutoDev multi-agent orchestrator
#[derive(Parser)]
#[command(
    name = "ad",
    about = "Coordinate planner, coding and DevOps agents from a single interface",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Orchestrator base URL (overrides config and AUTODEV_API_URL)
    #[arg(short = 'u', long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full-screen chat with plan sidebar (default)
    Tui,

    /// Line-oriented chat for plain terminals
    Repl,

    /// Request a plan for a goal and print it
    Plan {
        /// Goal to plan for
        goal: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the orchestrator is reachable
    Health,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autodev")
        .join("logs")
        .join("autodev.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with endpoint and log locations
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Orchestrator:\n");
    match std::env::var(API_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => {
            debug!("generate_after_help: endpoint from environment");
            help.push_str(&format!("  {}={}\n", API_URL_ENV, url.trim()));
        }
        _ => {
            debug!("generate_after_help: no endpoint in environment");
            help.push_str(&format!(
                "  {} not set (use --api-url or api.url in .autodev.yml)\n",
                API_URL_ENV
            ));
        }
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));

    help
}

/// Output format for one-shot commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
