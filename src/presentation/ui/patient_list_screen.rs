//! Patient list with local search.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::application::services::patient_search;
use crate::domain::entities::{Patient, PatientId};
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientListAction {
    None,
    Open(PatientId),
    NewPatient,
    Refresh,
    Logout,
    Quit,
}

pub struct PatientListScreen {
    patients: Vec<Patient>,
    search: TextInput,
    list_state: ListState,
    error: Option<String>,
}

impl PatientListScreen {
    #[must_use]
    pub fn new() -> Self {
        let mut search = TextInput::new("Search by name or RUT");
        search.set_focused(true);
        Self {
            patients: Vec::new(),
            search,
            list_state: ListState::default(),
            error: None,
        }
    }

    pub fn set_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
        self.error = None;
        self.reset_selection();
    }

    /// Adds a patient registered from this session without reloading.
    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.push(patient);
        self.reset_selection();
    }

    /// Load failure; the list keeps the last good result.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Patient> {
        patient_search::filter(&self.patients, self.search.value())
    }

    #[must_use]
    pub fn selected(&self) -> Option<PatientId> {
        let index = self.list_state.selected()?;
        self.visible().get(index).map(|patient| patient.id())
    }

    fn reset_selection(&mut self) {
        let any = !self.visible().is_empty();
        self.list_state.select(any.then_some(0));
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PatientListAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc if self.search.value().is_empty() => PatientListAction::Quit,
            KeyCode::Esc => {
                self.search.clear();
                self.reset_selection();
                PatientListAction::None
            }
            KeyCode::Char('n') if ctrl => PatientListAction::NewPatient,
            KeyCode::Char('r') if ctrl => PatientListAction::Refresh,
            KeyCode::F(5) => PatientListAction::Refresh,
            KeyCode::Char('l') if ctrl => PatientListAction::Logout,
            KeyCode::Up => {
                self.move_selection(false);
                PatientListAction::None
            }
            KeyCode::Down => {
                self.move_selection(true);
                PatientListAction::None
            }
            KeyCode::Enter => self
                .selected()
                .map_or(PatientListAction::None, PatientListAction::Open),
            _ => {
                if self.search.handle_key(key) {
                    self.reset_selection();
                }
                PatientListAction::None
            }
        }
    }
}

impl Default for PatientListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &mut PatientListScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [search_area, list_area, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        (&self.search).render(search_area, buf);

        let visible = self.visible();
        let title = format!(" Patients ({}/{}) ", visible.len(), self.patients.len());
        let items: Vec<ListItem> = visible
            .iter()
            .map(|patient| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<14}", patient.rut()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(patient.full_name()),
                ]))
            })
            .collect();
        let empty = items.is_empty();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("› ");
        StatefulWidget::render(list, list_area, buf, &mut self.list_state);

        if empty {
            let inner = Rect {
                x: list_area.x + 2,
                y: list_area.y + 1,
                width: list_area.width.saturating_sub(4),
                height: 1,
            };
            let text = if self.patients.is_empty() {
                "No patients registered yet. Ctrl+N adds one."
            } else {
                "No patient matches the search."
            };
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
        }

        let footer_line = match &self.error {
            Some(error) => Line::styled(
                format!("{error} (Ctrl+R to retry)"),
                Style::default().fg(Color::Red),
            ),
            None => Line::styled(
                "Enter: Open | Ctrl+N: New patient | Ctrl+R: Refresh | Ctrl+L: Logout | Esc: Quit",
                Style::default().fg(Color::DarkGray),
            ),
        };
        Paragraph::new(footer_line).render(footer, buf);
    }
}
