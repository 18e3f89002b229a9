//! Line-oriented interactive chat.
//!
//! Input lines and request outcomes are multiplexed on one task: stdin is read
//! through tokio, requests run on the [`RequestService`], and every event ends
//! with newly appended messages being printed (and logged).

use std::error::Error;
use std::sync::Arc;

use ratatui::text::Line;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::core::config::Settings;
use crate::core::conversation::ConversationController;
use crate::core::inference::InferenceClient;
use crate::core::request_service::RequestService;
use crate::ui::terminal::TerminalPrinter;
use crate::ui::theme::Theme;
use crate::ui::transcript::{
    error_banner_line, pending_line, quick_actions_line, stamped_message_lines, suggestion_lines,
};
use crate::utils::logging::TranscriptLog;

const HELP_TEXT: &str = "Type a message and press Enter. An empty line sends the staged text.\n\
/s <n> stage suggestion n, /q <n> stage quick action n, /dismiss hide the error, /quit leave.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    SendStaged,
    Suggestion(usize),
    QuickAction(usize),
    Dismiss,
    Help,
    Quit,
    Invalid(String),
}

/// Parses one input line. Selection indices are 1-based on the command line
/// and returned 0-based.
pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::SendStaged;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplCommand::Send(trimmed.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();
    match name {
        "quit" | "exit" => ReplCommand::Quit,
        "help" => ReplCommand::Help,
        "dismiss" => ReplCommand::Dismiss,
        "s" | "suggest" => parse_index(argument)
            .map(ReplCommand::Suggestion)
            .unwrap_or_else(|| ReplCommand::Invalid("Usage: /s <number>".to_string())),
        "q" | "quick" => parse_index(argument)
            .map(ReplCommand::QuickAction)
            .unwrap_or_else(|| ReplCommand::Invalid("Usage: /q <number>".to_string())),
        _ => ReplCommand::Invalid(format!("Unknown command: /{name}")),
    }
}

fn parse_index(argument: Option<&str>) -> Option<usize> {
    argument?
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| n - 1)
}

pub async fn run_chat(settings: Settings, log: TranscriptLog) -> Result<(), Box<dyn Error>> {
    let mut controller = ConversationController::from_settings(&settings);
    let client = controller.client();
    let (request_service, mut outcomes) = RequestService::new();

    let theme = Theme::dark_default();
    let printer = TerminalPrinter::stdout();

    eprintln!("🚀 Starting Finchat");
    eprintln!("📡 Using model: {}", settings.model);
    eprintln!("🌐 API endpoint: {}", settings.base_url);
    if log.is_active() {
        eprintln!("📝 Logging: {}", log.status_string());
    }
    eprintln!("💡 /help for commands, /quit or Ctrl+D to leave");

    let mut printed = 0;
    print_new_messages(&controller, &mut printed, &theme, &printer, &log)?;
    printer.print_lines(&[quick_actions_line(&theme), Line::from("")])?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => println!("{HELP_TEXT}"),
                    ReplCommand::Invalid(message) => eprintln!("⚠️  {message}"),
                    ReplCommand::Dismiss => {
                        if controller.last_error().is_some() {
                            controller.dismiss_error();
                            println!("Error dismissed.");
                        }
                    }
                    ReplCommand::Suggestion(index) => {
                        let suggestion = controller
                            .history()
                            .iter()
                            .rev()
                            .find(|message| !message.suggestions().is_empty())
                            .and_then(|message| message.suggestions().get(index))
                            .cloned();
                        match suggestion {
                            Some(suggestion) => {
                                controller.select_suggestion(&suggestion);
                                print_staged(&controller);
                            }
                            None => eprintln!("⚠️  No suggestion {}", index + 1),
                        }
                    }
                    ReplCommand::QuickAction(index) => {
                        if controller.select_quick_action(index) {
                            print_staged(&controller);
                        } else {
                            eprintln!("⚠️  No quick action {}", index + 1);
                        }
                    }
                    ReplCommand::Send(text) => {
                        submit(&mut controller, &request_service, &client, text, &theme, &printer)?;
                    }
                    ReplCommand::SendStaged => {
                        if controller.pending() {
                            printer.print_lines(&[pending_line(&theme)])?;
                        } else {
                            let staged = controller.take_staged_input();
                            submit(&mut controller, &request_service, &client, staged, &theme, &printer)?;
                        }
                    }
                }
            }
            Some((outcome, request_id)) = outcomes.recv() => {
                if controller.resolve(request_id, outcome) {
                    print_new_messages(&controller, &mut printed, &theme, &printer, &log)?;
                    if let Some(kind) = controller.last_error() {
                        printer.print_lines(&[error_banner_line(kind, &theme), Line::from("")])?;
                    }
                }
            }
        }
    }

    request_service.shutdown();
    Ok(())
}

fn submit(
    controller: &mut ConversationController,
    request_service: &RequestService,
    client: &Arc<dyn InferenceClient>,
    text: String,
    theme: &Theme,
    printer: &TerminalPrinter,
) -> Result<(), Box<dyn Error>> {
    if controller.pending() {
        printer.print_lines(&[pending_line(theme)])?;
        return Ok(());
    }
    if let Some(command) = controller.send(&text) {
        request_service.spawn_request(Arc::clone(client), command);
        printer.print_lines(&[pending_line(theme)])?;
    }
    Ok(())
}

fn print_staged(controller: &ConversationController) {
    println!(
        "Staged: {} (press Enter to send)",
        controller.state().staged_input()
    );
}

/// Prints and logs every message appended since the last call. User messages
/// are logged but not echoed, since the terminal already shows what was typed.
fn print_new_messages(
    controller: &ConversationController,
    printed: &mut usize,
    theme: &Theme,
    printer: &TerminalPrinter,
    log: &TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    for message in &controller.history()[*printed..] {
        if let Err(err) = log.log_message(message) {
            warn!(error = %err, "Failed to write transcript log");
        }
        if message.is_user() {
            continue;
        }
        let mut lines = stamped_message_lines(message, theme);
        lines.extend(suggestion_lines(message, theme));
        lines.push(Line::from(""));
        printer.print_lines(&lines)?;
    }
    *printed = controller.history().len();
    Ok(())
}
