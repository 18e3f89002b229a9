use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,
    pub list_marker_style: Style,

    // Chrome
    pub suggestion_style: Style,
    pub banner_style: Style,
    pub pending_indicator_style: Style,
    pub hint_style: Style,
    pub timestamp_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::Red),
            list_marker_style: Style::default().fg(Color::Blue),

            suggestion_style: Style::default().fg(Color::Blue),
            banner_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            pending_indicator_style: Style::default().fg(Color::DarkGray),
            hint_style: Style::default().fg(Color::DarkGray),
            timestamp_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Style-free theme for transcripts written to files or pipes.
    pub fn plain() -> Self {
        Theme {
            user_prefix_style: Style::default(),
            user_text_style: Style::default(),
            assistant_text_style: Style::default(),
            error_text_style: Style::default(),
            list_marker_style: Style::default(),
            suggestion_style: Style::default(),
            banner_style: Style::default(),
            pending_indicator_style: Style::default(),
            hint_style: Style::default(),
            timestamp_style: Style::default(),
        }
    }
}
