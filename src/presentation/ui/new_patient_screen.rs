//! New patient form.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::application::services::{ConditionList, PatientForm};
use crate::domain::entities::UserId;
use crate::domain::ports::NewPatient;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::{Checklist, ChecklistState, TextInput};

const TEXT_FIELDS: [(&str, &str); 4] = [
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("rut", "RUT"),
    ("birth_date", "Birth date (YYYY-MM-DD)"),
];
const FOCUS_STOPS: usize = TEXT_FIELDS.len() + 2;

#[derive(Debug)]
pub enum NewPatientAction {
    None,
    Submit(NewPatient),
    Back,
}

pub struct NewPatientScreen {
    form: PatientForm,
    inputs: [TextInput; 4],
    chronic: ChecklistState,
    predispositions: ChecklistState,
    focus: usize,
    author: UserId,
    today: NaiveDate,
}

impl NewPatientScreen {
    #[must_use]
    pub fn new(author: UserId, today: NaiveDate) -> Self {
        let mut inputs = TEXT_FIELDS.map(|(_, label)| TextInput::new(label));
        inputs[2] = TextInput::new(TEXT_FIELDS[2].1).placeholder("12.345.678-5");
        inputs[0].set_focused(true);
        Self {
            form: PatientForm::new(),
            inputs,
            chronic: ChecklistState::new(),
            predispositions: ChecklistState::new(),
            focus: 0,
            author,
            today,
        }
    }

    /// Server-side rejection shown as the form message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form.reject(message);
    }

    const fn checklist_at(focus: usize) -> Option<ConditionList> {
        match focus {
            4 => Some(ConditionList::ChronicDiseases),
            5 => Some(ConditionList::Predispositions),
            _ => None,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.set_focused(false);
        }
        self.focus = if forward {
            (self.focus + 1) % FOCUS_STOPS
        } else {
            (self.focus + FOCUS_STOPS - 1) % FOCUS_STOPS
        };
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.set_focused(true);
        }
    }

    /// Pushes the edited text through the form and echoes back its normalized value.
    fn apply_text(&mut self) {
        let index = self.focus;
        let text = self.inputs[index].value().to_string();
        let normalized = match index {
            0 => {
                self.form.set_first_name(&text);
                self.form.first_name().to_string()
            }
            1 => {
                self.form.set_last_name(&text);
                self.form.last_name().to_string()
            }
            2 => {
                self.form.set_rut(&text);
                self.form.rut().to_string()
            }
            _ => {
                self.form.set_birth_date(&text);
                self.form.birth_date().to_string()
            }
        };
        if normalized != text {
            self.inputs[index].set_value(&normalized);
        }
        self.show_errors();
    }

    fn show_errors(&mut self) {
        for ((key, _), input) in TEXT_FIELDS.iter().zip(self.inputs.iter_mut()) {
            input.set_error(self.form.errors().get(key));
        }
    }

    fn checklist_key(&mut self, list: ConditionList, key: KeyEvent) {
        let options = list.options();
        let state = match list {
            ConditionList::ChronicDiseases => &mut self.chronic,
            ConditionList::Predispositions => &mut self.predispositions,
        };
        match key.code {
            KeyCode::Down => state.next(options.len()),
            KeyCode::Up => state.previous(options.len()),
            KeyCode::Char(' ') => {
                if let Some(option) = options.get(state.cursor()) {
                    self.form.toggle(list, option);
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> NewPatientAction {
        if EventHandler::is_back_event(&key) {
            return NewPatientAction::Back;
        }
        let in_checklist = Self::checklist_at(self.focus);
        match key.code {
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Enter if self.focus < 3 => self.move_focus(true),
            KeyCode::Down if in_checklist.is_none() => self.move_focus(true),
            KeyCode::Up if in_checklist.is_none() => self.move_focus(false),
            _ if EventHandler::is_submit_event(&key) => {
                let result = self.form.submit(self.author, self.today);
                self.show_errors();
                if let Ok(patient) = result {
                    return NewPatientAction::Submit(patient);
                }
            }
            _ => match in_checklist {
                Some(list) => self.checklist_key(list, key),
                None => {
                    if self.inputs[self.focus].handle_key(key) {
                        self.apply_text();
                    }
                }
            },
        }
        NewPatientAction::None
    }
}

impl Widget for &mut NewPatientScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New patient ");
        let inner = block.inner(area);
        block.render(area, buf);

        let [fields_area, lists_area, message_area, hints_area] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let [top, bottom] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).areas(fields_area);
        let [first, last] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(top);
        let [rut, birth] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(bottom);
        for (input, slot) in self.inputs.iter().zip([first, last, rut, birth]) {
            input.render(slot, buf);
        }

        let [chronic_area, predisposition_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(lists_area);

        let form = &self.form;
        let is_chronic = |option: &str| form.is_selected(ConditionList::ChronicDiseases, option);
        let is_predisposition =
            |option: &str| form.is_selected(ConditionList::Predispositions, option);
        Checklist::new(
            ConditionList::ChronicDiseases.title(),
            ConditionList::ChronicDiseases.options(),
            &is_chronic,
        )
        .focused(self.focus == 4)
        .render(chronic_area, buf, &mut self.chronic);
        Checklist::new(
            ConditionList::Predispositions.title(),
            ConditionList::Predispositions.options(),
            &is_predisposition,
        )
        .focused(self.focus == 5)
        .render(predisposition_area, buf, &mut self.predispositions);

        if let Some(message) = form.errors().form() {
            Paragraph::new(Line::styled(message, Style::default().fg(Color::Red)))
                .render(message_area, buf);
        }
        Paragraph::new(Line::styled(
            "Tab: Next | Space: Check condition | Ctrl+S: Save | Esc: Cancel",
            Style::default().fg(Color::DarkGray),
        ))
        .render(hints_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut NewPatientScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn screen() -> NewPatientScreen {
        NewPatientScreen::new(UserId(7), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn save() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_inputs_echo_normalized_values() {
        let mut screen = screen();
        type_text(&mut screen, "juan pablo");
        assert_eq!(screen.inputs[0].value(), "Juan Pablo");

        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "123456785");
        assert_eq!(screen.inputs[2].value(), "12.345.678-5");
        assert!(screen.form.errors().get("rut").is_none());
    }

    #[test]
    fn test_complete_form_submits_with_conditions() {
        let mut screen = screen();
        type_text(&mut screen, "ana");
        screen.handle_key(key(KeyCode::Enter));
        type_text(&mut screen, "rojas");
        screen.handle_key(key(KeyCode::Enter));
        type_text(&mut screen, "123456785");
        screen.handle_key(key(KeyCode::Enter));
        type_text(&mut screen, "1950-03-14");
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Char(' ')));

        match screen.handle_key(save()) {
            NewPatientAction::Submit(patient) => {
                assert_eq!(patient.first_name, "Ana");
                assert_eq!(patient.rut, "12.345.678-5");
                assert_eq!(
                    patient.chronic_diseases,
                    vec![ConditionList::ChronicDiseases.options()[1].to_string()]
                );
                assert!(patient.predispositions.is_empty());
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_first_failing_field_is_marked() {
        let mut screen = screen();
        type_text(&mut screen, "ana");
        assert!(matches!(screen.handle_key(save()), NewPatientAction::None));
        assert!(screen.form.errors().has("last_name"));
        assert!(screen.form.errors().form().is_some());
    }

    #[test]
    fn test_server_rejection_is_shown() {
        let mut screen = screen();
        screen.set_error("Patient with this rut already exists.");
        assert_eq!(
            screen.form.errors().form(),
            Some("Patient with this rut already exists.")
        );
    }
}
