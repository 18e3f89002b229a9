//! Prints styled lines to a plain terminal stream without taking over the
//! screen. Styles are mapped onto ANSI through crossterm; when the output is
//! not a terminal the text is written unstyled.

use std::io::{self, IsTerminal, Write};

use ratatui::crossterm::style::{Attribute, Color as TermColor, StyledContent, Stylize};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

pub struct TerminalPrinter {
    styled: bool,
}

impl TerminalPrinter {
    pub fn stdout() -> Self {
        let styled = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { styled }
    }

    pub fn unstyled() -> Self {
        Self { styled: false }
    }

    pub fn print_lines(&self, lines: &[Line<'_>]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_lines(&mut out, lines)?;
        out.flush()
    }

    pub fn write_lines<W: Write>(&self, out: &mut W, lines: &[Line<'_>]) -> io::Result<()> {
        for line in lines {
            for span in &line.spans {
                if self.styled {
                    write!(out, "{}", styled(&span.content, span.style))?;
                } else {
                    write!(out, "{}", span.content)?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn styled(text: &str, style: Style) -> StyledContent<&str> {
    let mut content = text.stylize();
    if let Some(color) = style.fg.and_then(term_color) {
        content = content.with(color);
    }
    if style.add_modifier.contains(Modifier::BOLD) {
        content = content.attribute(Attribute::Bold);
    }
    content
}

fn term_color(color: Color) -> Option<TermColor> {
    let mapped = match color {
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        _ => return None,
    };
    Some(mapped)
}
