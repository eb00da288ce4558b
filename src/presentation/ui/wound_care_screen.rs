//! Four-section wound-care wizard.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::application::services::{CareField, FieldKind, Section, WoundCareWizard};
use crate::domain::entities::{PatientId, UserId, WoundId};
use crate::domain::ports::NewWoundCare;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::{EditHint, FieldRow};

#[derive(Debug)]
pub enum WoundCareAction {
    None,
    Submit(NewWoundCare),
    Back,
}

pub struct WoundCareScreen {
    wizard: WoundCareWizard,
    field_index: usize,
    heading: String,
    author: UserId,
    rejected: Option<String>,
}

impl WoundCareScreen {
    #[must_use]
    pub fn new(
        patient: PatientId,
        wound: WoundId,
        heading: String,
        author: UserId,
        today: NaiveDate,
    ) -> Self {
        Self {
            wizard: WoundCareWizard::new(patient, wound, today),
            field_index: 0,
            heading,
            author,
            rejected: None,
        }
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.wizard.patient()
    }

    #[must_use]
    pub const fn wound(&self) -> WoundId {
        self.wizard.wound()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.wizard.reject(message);
    }

    fn fields(&self) -> &'static [CareField] {
        self.wizard.current().fields()
    }

    fn focused_field(&self) -> Option<CareField> {
        self.fields().get(self.field_index).copied()
    }

    fn move_field(&mut self, forward: bool) {
        let len = self.fields().len();
        if len == 0 {
            return;
        }
        self.field_index = if forward {
            (self.field_index + 1) % len
        } else {
            (self.field_index + len - 1) % len
        };
    }

    fn change_section(&mut self, forward: bool) -> bool {
        let moved = if forward {
            self.wizard.next()
        } else {
            self.wizard.previous()
        };
        if moved {
            self.field_index = 0;
        }
        moved
    }

    fn submit(&mut self) -> WoundCareAction {
        match self.wizard.submit(self.author) {
            Ok(care) => WoundCareAction::Submit(care),
            Err(_) => WoundCareAction::None,
        }
    }

    fn edit_field(&mut self, field: CareField, key: KeyEvent) {
        let result = match (field.kind(), key.code) {
            (FieldKind::Numeric | FieldKind::Text, KeyCode::Char(c)) => {
                let mut value = self.wizard.value(field).to_string();
                value.push(c);
                self.wizard.set_value(field, value)
            }
            (FieldKind::Numeric | FieldKind::Text, KeyCode::Backspace) => {
                let mut value = self.wizard.value(field).to_string();
                value.pop();
                self.wizard.set_value(field, value)
            }
            (FieldKind::Choice, KeyCode::Left) => self.wizard.cycle_option(field, false),
            (FieldKind::Choice, KeyCode::Right | KeyCode::Char(' ')) => {
                self.wizard.cycle_option(field, true)
            }
            (FieldKind::Choice, KeyCode::Backspace | KeyCode::Delete) => {
                self.wizard.set_value(field, "")
            }
            (FieldKind::Toggle, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) => {
                self.wizard.toggle_debridement()
            }
            (FieldKind::Date, KeyCode::Left) => self.wizard.shift_next_care_date(-1),
            (FieldKind::Date, KeyCode::Right) => self.wizard.shift_next_care_date(1),
            (FieldKind::Date, KeyCode::PageUp) => self.wizard.shift_next_care_date(-7),
            (FieldKind::Date, KeyCode::PageDown) => self.wizard.shift_next_care_date(7),
            _ => Ok(()),
        };
        self.rejected = result.err().map(|rejected| rejected.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> WoundCareAction {
        self.rejected = None;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                if !self.change_section(false) {
                    return WoundCareAction::Back;
                }
            }
            KeyCode::Enter if self.wizard.is_last() => return self.submit(),
            KeyCode::Enter => {
                self.change_section(true);
            }
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.move_field(true),
            KeyCode::BackTab | KeyCode::Up => self.move_field(false),
            _ => {
                if let Some(field) = self.focused_field() {
                    self.edit_field(field, key);
                }
            }
        }
        WoundCareAction::None
    }

    fn hint(kind: FieldKind) -> EditHint {
        match kind {
            FieldKind::Numeric | FieldKind::Text => EditHint::Typing,
            FieldKind::Choice => EditHint::Cycle,
            FieldKind::Toggle => EditHint::Toggle,
            FieldKind::Date => EditHint::Days,
        }
    }
}

impl Widget for &WoundCareScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let section = self.wizard.current();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Wound care · {} ", self.heading));
        let inner = block.inner(area);
        block.render(area, buf);

        let fields = section.fields();
        #[allow(clippy::cast_possible_truncation)]
        let field_rows = fields.len() as u16;
        let [gauge_area, title_area, fields_area, _, message_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(field_rows),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(self.wizard.progress())
            .label(format!(
                "Section {} of {}",
                section.index() + 1,
                Section::ALL.len()
            ))
            .render(gauge_area, buf);

        Paragraph::new(Line::from(Span::styled(
            section.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .render(title_area, buf);

        let rows = Layout::vertical(vec![Constraint::Length(1); fields.len()]).split(fields_area);
        for (index, (field, row)) in fields.iter().zip(rows.iter()).enumerate() {
            let value = self.wizard.display_value(*field);
            FieldRow::new(field.label(), &value, WoundCareScreen::hint(field.kind()))
                .focused(index == self.field_index)
                .error(self.wizard.errors().get(field.key()))
                .render(*row, buf);
        }

        let message = self
            .rejected
            .as_deref()
            .or_else(|| self.wizard.errors().form());
        if let Some(message) = message {
            Paragraph::new(Line::styled(message, Style::default().fg(Color::Red)))
                .render(message_area, buf);
        }

        let hints = if self.wizard.is_last() {
            "↑/↓: Field | Enter or Ctrl+S: Save | Esc: Previous section"
        } else if section.index() == 0 {
            "↑/↓: Field | Enter: Next section | Esc: Cancel"
        } else {
            "↑/↓: Field | Enter: Next section | Esc: Previous section"
        };
        Paragraph::new(Line::styled(hints, Style::default().fg(Color::DarkGray)))
            .render(hints_area, buf);
    }
}
