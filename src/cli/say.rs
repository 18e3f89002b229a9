//! Non-interactive "say" command

use std::error::Error;

use tracing::warn;

use crate::core::config::Settings;
use crate::core::conversation::ConversationController;
use crate::core::message::Message;
use crate::ui::terminal::TerminalPrinter;
use crate::ui::theme::Theme;
use crate::ui::transcript::{stamped_message_lines, suggestion_lines};
use crate::utils::logging::TranscriptLog;

pub async fn run_say(
    prompt: Vec<String>,
    settings: Settings,
    log: TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: finchat say <prompt>");
        std::process::exit(1);
    }

    let mut controller = ConversationController::from_settings(&settings);
    let seeded = controller.history().len();
    controller.send_and_wait(&prompt).await;

    let appended = &controller.history()[seeded..];
    for message in appended {
        if let Err(err) = log.log_message(message) {
            warn!(error = %err, "Failed to write transcript log");
        }
    }

    let Some(reply) = appended.last().filter(|message| !message.is_user()) else {
        return Ok(());
    };
    if reply.is_error() {
        eprintln!("❌ Error: {}", reply.raw_content());
        std::process::exit(1);
    }

    TerminalPrinter::stdout().print_lines(&reply_lines(reply, &Theme::dark_default()))?;
    Ok(())
}

fn reply_lines(reply: &Message, theme: &Theme) -> Vec<ratatui::text::Line<'static>> {
    let mut lines = stamped_message_lines(reply, theme);
    lines.extend(suggestion_lines(reply, theme));
    lines
}
