//! Create-account screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use zeroize::Zeroizing;

use crate::application::services::AccountForm;
use crate::domain::ports::NewAccount;
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::TextInput;

const FIELDS: [(&str, &str); 5] = [
    ("first_name", "First name"),
    ("last_name", "Last name"),
    ("email", "Email"),
    ("password", "Password"),
    ("confirm_password", "Confirm password"),
];

#[derive(Debug)]
pub enum CreateAccountAction {
    None,
    Submit(NewAccount),
    Back,
}

pub struct CreateAccountScreen {
    form: AccountForm,
    inputs: [TextInput; 5],
    focus: usize,
    message: Option<String>,
}

impl CreateAccountScreen {
    #[must_use]
    pub fn new() -> Self {
        let inputs = FIELDS.map(|(key, label)| {
            let input = TextInput::new(label);
            if key.contains("password") {
                input.password()
            } else {
                input
            }
        });
        let mut screen = Self {
            form: AccountForm::new(),
            inputs,
            focus: 0,
            message: None,
        };
        screen.inputs[0].set_focused(true);
        screen
    }

    /// Server-side rejection shown under the form.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn move_focus(&mut self, forward: bool) {
        self.inputs[self.focus].set_focused(false);
        let len = self.inputs.len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
        self.inputs[self.focus].set_focused(true);
    }

    fn sync_form(&mut self) {
        self.form.first_name = self.inputs[0].value().to_string();
        self.form.last_name = self.inputs[1].value().to_string();
        self.form.email = self.inputs[2].value().to_string();
        self.form.password = Zeroizing::new(self.inputs[3].value().to_string());
        self.form.confirm_password = Zeroizing::new(self.inputs[4].value().to_string());
    }

    fn show_errors(&mut self) {
        for ((key, _), input) in FIELDS.iter().zip(self.inputs.iter_mut()) {
            input.set_error(self.form.errors().get(key));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CreateAccountAction {
        if EventHandler::is_back_event(&key) {
            return CreateAccountAction::Back;
        }
        let last = self.focus == self.inputs.len() - 1;
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter if !last => self.move_focus(true),
            _ if EventHandler::is_submit_event(&key) => {
                self.sync_form();
                self.message = None;
                let result = self.form.submit();
                self.show_errors();
                if let Ok(account) = result {
                    return CreateAccountAction::Submit(account);
                }
            }
            _ => {
                self.inputs[self.focus].handle_key(key);
            }
        }
        CreateAccountAction::None
    }
}

impl Default for CreateAccountScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &CreateAccountScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(21),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(64),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Create account ");
        let inner = block.inner(content);
        block.render(content, buf);

        let mut constraints = vec![Constraint::Length(3); self.inputs.len()];
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Min(1));
        let rows = Layout::vertical(constraints).split(inner);

        for (input, row) in self.inputs.iter().zip(rows.iter()) {
            input.render(*row, buf);
        }

        let footer = match &self.message {
            Some(message) => Line::styled(message.as_str(), Style::default().fg(Color::Red)),
            None => Line::styled(
                "Tab: Next field | Enter on last field or Ctrl+S: Create | Esc: Back",
                Style::default().fg(Color::DarkGray),
            ),
        };
        Paragraph::new(footer)
            .wrap(Wrap { trim: true })
            .render(rows[rows.len() - 1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fill(screen: &mut CreateAccountScreen, values: [&str; 5]) {
        for value in values {
            for c in value.chars() {
                screen.handle_key(key(KeyCode::Char(c)));
            }
            screen.handle_key(key(KeyCode::Tab));
        }
    }

    #[test]
    fn test_complete_form_submits_account() {
        let mut screen = CreateAccountScreen::new();
        fill(&mut screen, ["Ana", "Rojas", "ana@clinic.cl", "s3cret", "s3cret"]);

        let action = screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        match action {
            CreateAccountAction::Submit(account) => {
                assert_eq!(account.first_name, "Ana");
                assert_eq!(account.credentials.email, "ana@clinic.cl");
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_confirmation_marks_field() {
        let mut screen = CreateAccountScreen::new();
        fill(&mut screen, ["Ana", "Rojas", "ana@clinic.cl", "s3cret", "other"]);
        screen.handle_key(key(KeyCode::BackTab));

        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)),
            CreateAccountAction::None
        ));
        assert!(screen.form.errors().has("confirm_password"));
        assert!(!screen.form.errors().has("email"));
    }

    #[test]
    fn test_enter_moves_to_next_field_before_last() {
        let mut screen = CreateAccountScreen::new();
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.focus, 1);
    }

    #[test]
    fn test_escape_goes_back() {
        let mut screen = CreateAccountScreen::new();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Esc)),
            CreateAccountAction::Back
        ));
    }
}
