//! REPL session management
//!
//! Unlike the TUI, the line-mode REPL waits for the initial plan before it
//! shows the first prompt.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::session::{Message, PLANNER_AUTHOR, SessionController, SubmitRejected};

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// Interactive line-mode session
pub struct ReplSession {
    controller: SessionController,
    /// Number of log entries already printed
    printed: usize,
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(controller: SessionController) -> Self {
        debug!("ReplSession::new: called");
        Self { controller, printed: 0 }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        println!("{}", "Requesting initial plan...".dimmed());
        self.controller.bootstrap().await;
        self.print_new_messages();
        if self.controller.state().has_session() {
            self.print_plan();
        }
        self.print_error();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line.as_str());

                    match parse_line(&line) {
                        ReplInput::Command(cmd) => match self.handle_slash_command(&cmd) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        },
                        ReplInput::Message(text) => self.process_user_input(text).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Submit one line as a chat turn and print what it produced
    async fn process_user_input(&mut self, line: String) {
        debug!(line_len = line.len(), "process_user_input: called");
        self.controller.update_pending_input(line);

        // The user's own line is already on screen from the prompt
        println!("{}", "Thinking...".dimmed());
        match self.controller.submit_pending().await {
            Ok(()) => {
                self.print_new_messages_after_user();
                self.print_error();
            }
            Err(SubmitRejected::NoSession) => {
                println!(
                    "{}",
                    "No session yet - the initial plan has not been created. Restart to retry.".dimmed()
                );
            }
            Err(rejected) => {
                debug!(%rejected, "process_user_input: submit rejected");
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "AutoDev Architect".bright_cyan().bold());
        println!("Coordinate planner, coding and DevOps agents from a single interface.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/plan" | "/p" => {
                self.print_plan();
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Show the execution plan", "/plan".yellow());
        println!("  {:14} Show the whole conversation", "/history".yellow());
        println!("  {:14} Exit the REPL", "/quit".yellow());
        println!();
        println!("Anything else is sent to the agents. Start a line with {} to send", "//".yellow());
        println!("a message that begins with a literal {}.", "/".yellow());
        println!();
    }

    fn print_plan(&self) {
        let state = self.controller.state();
        println!();
        println!("{}", "Execution plan".bright_cyan());
        if state.plan.is_empty() {
            println!("{}", "  (no steps)".dimmed());
        } else {
            print!("{}", super::format_plan(&state.plan));
        }
        println!();
    }

    fn print_history(&self) {
        let messages = &self.controller.state().messages;
        if messages.is_empty() {
            println!("{}", "No conversation yet.".dimmed());
            return;
        }
        println!();
        for message in messages {
            print_message(message);
        }
        println!();
    }

    fn print_error(&self) {
        if let Some(error) = &self.controller.state().error {
            println!("{} {}", "!".bright_red(), error.red());
        }
    }

    fn print_new_messages(&mut self) {
        let messages = &self.controller.state().messages;
        for message in &messages[self.printed..] {
            print_message(message);
        }
        self.printed = messages.len();
    }

    /// Like `print_new_messages`, but the first new entry is the echo of what
    /// the operator just typed
    fn print_new_messages_after_user(&mut self) {
        let messages = &self.controller.state().messages;
        for message in new_replies(messages, self.printed) {
            print_message(message);
        }
        self.printed = messages.len();
    }
}

/// A line read at the prompt
#[derive(Debug, PartialEq, Eq)]
enum ReplInput {
    Command(String),
    Message(String),
}

/// Split slash commands from chat text; `//` escapes a leading slash
fn parse_line(line: &str) -> ReplInput {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("//") {
        ReplInput::Message(format!("/{}", rest))
    } else if trimmed.starts_with('/') {
        ReplInput::Command(line.trim().to_string())
    } else {
        ReplInput::Message(line.to_string())
    }
}

/// Entries appended by a turn, minus the operator's own echo at its head
fn new_replies(messages: &[Message], printed: usize) -> impl Iterator<Item = &Message> {
    messages.get(printed..).unwrap_or_default().iter().skip(1)
}

fn print_message(message: &Message) {
    let author = if message.is_user() {
        message.author.bright_green().bold()
    } else if message.author == PLANNER_AUTHOR {
        message.author.bright_magenta().bold()
    } else {
        message.author.bright_blue().bold()
    };
    println!("{}", author);
    for line in message.content.lines() {
        println!("  {}", line);
    }
}
