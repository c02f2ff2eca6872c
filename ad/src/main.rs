//! AutoDev - terminal client for the AutoDev orchestrator
//!
//! CLI entry point for the chat front ends and one-shot commands.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use autodev::api::{OrchestratorApi, create_client};
use autodev::cli::{Cli, Command, OutputFormat, generate_after_help};
use autodev::config::Config;
use autodev::{repl, tui};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autodev")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("autodev.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows the endpoint and log path
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("AutoDev loaded config: seed-goal={}", config.session.seed_goal);

    let api = create_client(&config.api, cli.api_url.as_deref()).context("Failed to create orchestrator client")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Tui) => {
            debug!("main: matched Tui command");
            tui::run(&config, api).await
        }
        Some(Command::Repl) => {
            debug!("main: matched Repl command");
            repl::run_interactive(&config, api).await
        }
        Some(Command::Plan { goal, format }) => {
            debug!(%goal, ?format, "main: matched Plan command");
            cmd_plan(api, &goal, format).await
        }
        Some(Command::Health) => {
            debug!("main: matched Health command");
            cmd_health(api).await
        }
    }
}

/// Request a plan for `goal` and print it
async fn cmd_plan(api: Arc<dyn OrchestratorApi>, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(%goal, "cmd_plan: called");
    let plan = api.request_plan(goal).await.context("Failed to fetch plan")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Session:".bright_cyan(), plan.session_id);
            println!("{} {}", "Goal:".bright_cyan(), plan.goal);
            println!("{}", "Execution plan".bright_cyan());
            print!("{}", repl::format_plan(&plan.plan));
        }
    }
    Ok(())
}

/// Report whether the orchestrator answers its health check
async fn cmd_health(api: Arc<dyn OrchestratorApi>) -> Result<()> {
    debug!("cmd_health: called");
    let health = api.health().await.context("Orchestrator is unreachable")?;

    if health.is_ok() {
        println!("{} orchestrator status: {}", "✓".green(), health.status);
        Ok(())
    } else {
        eyre::bail!("Orchestrator reported status: {}", health.status)
    }
}
