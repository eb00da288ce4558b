//! Bottom status line: session, last notice and key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// A short message shown until the next screen change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: StatusLevel,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Info,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Success,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Warning,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: StatusLevel::Error,
        }
    }
}

/// Status bar widget.
#[derive(Debug, Clone, Default)]
pub struct StatusBar<'a> {
    session: Option<&'a str>,
    notice: Option<&'a Notice>,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    #[must_use]
    pub const fn new(hints: &'a str) -> Self {
        Self {
            session: None,
            notice: None,
            hints,
        }
    }

    /// Name of the signed-in clinician.
    #[must_use]
    pub const fn session(mut self, name: Option<&'a str>) -> Self {
        self.session = name;
        self
    }

    #[must_use]
    pub const fn notice(mut self, notice: Option<&'a Notice>) -> Self {
        self.notice = notice;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let left = match self.session {
            Some(name) => format!(" {name} "),
            None => " not signed in ".to_string(),
        };
        let right = format!("{} ", self.hints);

        let mut spans = vec![Span::styled(
            left.clone(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        let mut used = left.chars().count();

        if let Some(notice) = self.notice {
            let text = format!(" {}", notice.message);
            used += text.chars().count();
            spans.push(Span::styled(
                text,
                Style::default()
                    .fg(notice.level.color())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let right_len = right.chars().count();
        if used + right_len < width {
            spans.push(Span::raw(" ".repeat(width - used - right_len)));
            spans.push(Span::styled(right, Style::default().fg(Color::DarkGray)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bar: StatusBar<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_renders_session_notice_and_hints() {
        let notice = Notice::success("Patient registered");
        let line = rendered(
            StatusBar::new("Esc back")
                .session(Some("Ana Rojas"))
                .notice(Some(&notice)),
            60,
        );
        assert!(line.starts_with(" Ana Rojas "));
        assert!(line.contains("Patient registered"));
        assert!(line.trim_end().ends_with("Esc back"));
    }

    #[test]
    fn test_hints_dropped_when_too_narrow() {
        let line = rendered(StatusBar::new("Ctrl+C quit"), 16);
        assert!(line.contains("not signed in"));
        assert!(!line.contains("quit"));
    }
}
