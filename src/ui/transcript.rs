//! Walks conversation messages and their render trees into styled
//! [`ratatui`] lines. Nothing here interprets markup: emphasis and list
//! structure come from the typed nodes produced by the formatter.

use chrono::Local;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span as TextSpan};

use crate::core::constants::QUICK_ACTIONS;
use crate::core::errors::ErrorKind;
use crate::core::formatter::{RenderNode, Span};
use crate::core::message::Message;
use crate::ui::theme::Theme;

pub const USER_PREFIX: &str = "You: ";
pub const BULLET_MARKER: &str = "• ";

pub fn build_display_lines(history: &[Message], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in history {
        lines.extend(message_lines(message, theme));
        lines.extend(suggestion_lines(message, theme));
        lines.push(Line::from(""));
    }
    lines
}

pub fn message_lines(message: &Message, theme: &Theme) -> Vec<Line<'static>> {
    let Some(nodes) = message.rendered_content() else {
        return message
            .raw_content()
            .lines()
            .enumerate()
            .map(|(index, text)| {
                let prefix = if index == 0 { USER_PREFIX } else { "     " };
                Line::from(vec![
                    TextSpan::styled(prefix, theme.user_prefix_style),
                    TextSpan::styled(text.to_string(), theme.user_text_style),
                ])
            })
            .collect();
    };

    let base = if message.is_error() {
        theme.error_text_style
    } else {
        theme.assistant_text_style
    };
    nodes
        .iter()
        .map(|node| node_line(node, base, theme))
        .collect()
}

/// Local wall-clock time a message was created, as `HH:MM`.
pub fn timestamp_label(message: &Message) -> String {
    message
        .timestamp()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

/// [`message_lines`] with the message time appended to the first line.
pub fn stamped_message_lines(message: &Message, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = message_lines(message, theme);
    let stamp = TextSpan::styled(format!("  {}", timestamp_label(message)), theme.timestamp_style);
    match lines.first_mut() {
        Some(first) => first.spans.push(stamp),
        None => lines.push(Line::from(stamp)),
    }
    lines
}

pub fn node_line(node: &RenderNode, base: Style, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(node.spans().len() + 1);
    match node {
        RenderNode::Paragraph { .. } => {}
        RenderNode::BulletItem { .. } => {
            spans.push(TextSpan::styled(BULLET_MARKER, theme.list_marker_style));
        }
        RenderNode::NumberedItem { ordinal, .. } => {
            spans.push(TextSpan::styled(
                format!("{ordinal}. "),
                theme.list_marker_style,
            ));
        }
    }
    spans.extend(node.spans().iter().map(|span| text_span(span, base)));
    Line::from(spans)
}

fn text_span(span: &Span, base: Style) -> TextSpan<'static> {
    match span {
        Span::PlainText { text } => TextSpan::styled(text.clone(), base),
        Span::Emphasis { text } => {
            TextSpan::styled(text.clone(), base.add_modifier(Modifier::BOLD))
        }
    }
}

/// Numbered suggestion chips, so the REPL can select them by index.
pub fn suggestion_lines(message: &Message, theme: &Theme) -> Vec<Line<'static>> {
    if message.suggestions().is_empty() {
        return Vec::new();
    }
    let mut spans = vec![TextSpan::styled("Suggested: ", theme.hint_style)];
    for (index, suggestion) in message.suggestions().iter().enumerate() {
        if index > 0 {
            spans.push(TextSpan::raw("  "));
        }
        spans.push(TextSpan::styled(
            format!("[{}] {}", index + 1, suggestion.text),
            theme.suggestion_style,
        ));
    }
    vec![Line::from(spans)]
}

pub fn quick_actions_line(theme: &Theme) -> Line<'static> {
    let mut spans = vec![TextSpan::styled("Quick actions: ", theme.hint_style)];
    for (index, (label, _)) in QUICK_ACTIONS.iter().enumerate() {
        if index > 0 {
            spans.push(TextSpan::raw("  "));
        }
        spans.push(TextSpan::styled(
            format!("({}) {}", index + 1, label),
            theme.suggestion_style,
        ));
    }
    Line::from(spans)
}

pub fn error_banner_line(kind: ErrorKind, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        TextSpan::styled("! ", theme.banner_style),
        TextSpan::styled(kind.user_message(), theme.banner_style),
        TextSpan::styled("  (/dismiss to hide)", theme.hint_style),
    ])
}

pub fn pending_line(theme: &Theme) -> Line<'static> {
    Line::from(TextSpan::styled("Assistant is typing…", theme.pending_indicator_style))
}
