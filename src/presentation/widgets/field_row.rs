//! One labelled value per line, used by the wizard and the wound form.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const LABEL_WIDTH: usize = 24;

/// How the value is edited, shown as a hint next to the focused row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditHint {
    Typing,
    Cycle,
    Toggle,
    Days,
}

impl EditHint {
    const fn text(self) -> &'static str {
        match self {
            Self::Typing => "type",
            Self::Cycle => "←/→ choose",
            Self::Toggle => "space toggles",
            Self::Days => "←/→ ±1 day, PgUp/PgDn ±7",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRow<'a> {
    label: &'a str,
    value: &'a str,
    hint: EditHint,
    focused: bool,
    error: Option<&'a str>,
}

impl<'a> FieldRow<'a> {
    #[must_use]
    pub const fn new(label: &'a str, value: &'a str, hint: EditHint) -> Self {
        Self {
            label,
            value,
            hint,
            focused: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub const fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for FieldRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let marker = if self.focused { "› " } else { "  " };
        let label_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = if self.value.is_empty() { "—" } else { self.value };

        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<LABEL_WIDTH$}", self.label), label_style),
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::White).add_modifier(if self.focused {
                    Modifier::UNDERLINED
                } else {
                    Modifier::empty()
                }),
            ),
        ];

        if let Some(error) = self.error {
            spans.push(Span::styled(
                format!("  {error}"),
                Style::default().fg(Color::Red),
            ));
        } else if self.focused {
            spans.push(Span::styled(
                format!("  ({})", self.hint.text()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
