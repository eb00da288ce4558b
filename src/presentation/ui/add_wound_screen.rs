//! Add-wound form.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::application::services::WoundForm;
use crate::domain::entities::{PatientId, UserId};
use crate::domain::ports::NewWound;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::{EditHint, FieldRow, TextInput};

#[derive(Debug)]
pub enum AddWoundAction {
    None,
    Submit(NewWound),
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Location,
    Origin,
    OriginDate,
}

pub struct AddWoundScreen {
    form: WoundForm,
    location: TextInput,
    focus: Focus,
    patient_name: String,
    author: UserId,
}

impl AddWoundScreen {
    #[must_use]
    pub fn new(patient: PatientId, patient_name: String, author: UserId, today: NaiveDate) -> Self {
        let mut location = TextInput::new("Wound location").placeholder("e.g. Right heel");
        location.set_focused(true);
        Self {
            form: WoundForm::new(patient, today),
            location,
            focus: Focus::Location,
            patient_name,
            author,
        }
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.form.patient()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form.reject(message);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.location.set_focused(focus == Focus::Location);
    }

    fn move_focus(&mut self, forward: bool) {
        let next = match (self.focus, forward) {
            (Focus::Location, true) | (Focus::OriginDate, false) => Focus::Origin,
            (Focus::Origin, true) | (Focus::Location, false) => Focus::OriginDate,
            (Focus::OriginDate, true) | (Focus::Origin, false) => Focus::Location,
        };
        self.set_focus(next);
    }

    fn submit(&mut self) -> AddWoundAction {
        let result = self.form.submit(self.author);
        self.location
            .set_error(self.form.errors().get("wound_location"));
        match result {
            Ok(wound) => AddWoundAction::Submit(wound),
            Err(_) => AddWoundAction::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AddWoundAction {
        if EventHandler::is_back_event(&key) {
            return AddWoundAction::Back;
        }
        match (self.focus, key.code) {
            (_, KeyCode::Tab | KeyCode::Down) => self.move_focus(true),
            (_, KeyCode::BackTab | KeyCode::Up) => self.move_focus(false),
            (Focus::OriginDate, KeyCode::Enter) => return self.submit(),
            (_, KeyCode::Enter) => self.move_focus(true),
            _ if EventHandler::is_submit_event(&key) => return self.submit(),
            (Focus::Origin, KeyCode::Left) => self.form.cycle_origin(false),
            (Focus::Origin, KeyCode::Right | KeyCode::Char(' ')) => self.form.cycle_origin(true),
            (Focus::OriginDate, KeyCode::Left) => self.form.shift_origin_date(-1),
            (Focus::OriginDate, KeyCode::Right) => self.form.shift_origin_date(1),
            (Focus::OriginDate, KeyCode::PageUp) => self.form.shift_origin_date(-7),
            (Focus::OriginDate, KeyCode::PageDown) => self.form.shift_origin_date(7),
            (Focus::Location, _) => {
                if self.location.handle_key(key) {
                    self.form.set_location(self.location.value());
                }
            }
            _ => {}
        }
        AddWoundAction::None
    }
}

impl Widget for &AddWoundScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" New wound · {} ", self.patient_name));
        let inner = block.inner(area);
        block.render(area, buf);

        let [location_area, _, origin_area, date_area, _, message_area, hints_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        (&self.location).render(location_area, buf);

        let origin = self.form.origin().map_or("", |origin| origin.label());
        FieldRow::new("Wound origin", origin, EditHint::Cycle)
            .focused(self.focus == Focus::Origin)
            .error(self.form.errors().get("wound_origin"))
            .render(origin_area, buf);

        let date = self.form.origin_date().format("%Y-%m-%d").to_string();
        FieldRow::new("Origin date", &date, EditHint::Days)
            .focused(self.focus == Focus::OriginDate)
            .render(date_area, buf);

        if let Some(message) = self.form.errors().form() {
            Paragraph::new(Line::styled(message, Style::default().fg(Color::Red)))
                .render(message_area, buf);
        }
        Paragraph::new(Line::styled(
            "Tab: Next | Ctrl+S: Save | Esc: Cancel",
            Style::default().fg(Color::DarkGray),
        ))
        .render(hints_area, buf);
    }
}
