//! Login screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::application::dto::LoginRequest;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Input,
    Validating,
    Error,
}

/// Which credential the clinician is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Password,
    Google,
}

#[derive(Debug)]
pub enum LoginAction {
    None,
    Submit(LoginRequest),
    CreateAccount,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Email,
    Password,
}

/// Login screen UI.
pub struct LoginScreen {
    email_input: TextInput,
    password_input: TextInput,
    google_input: TextInput,
    focus: Focus,
    mode: LoginMode,
    state: LoginState,
    error_message: Option<String>,
}

impl LoginScreen {
    #[must_use]
    pub fn new() -> Self {
        let mut email_input = TextInput::new("Email").placeholder("name@clinic.cl");
        email_input.set_focused(true);

        Self {
            email_input,
            password_input: TextInput::new("Password").password(),
            google_input: TextInput::new("Google ID token")
                .password()
                .placeholder("Paste the ID token issued by Google"),
            focus: Focus::Email,
            mode: LoginMode::Password,
            state: LoginState::Input,
            error_message: None,
        }
    }

    /// Login screen showing why the previous session ended.
    #[must_use]
    pub fn with_error(message: impl Into<String>) -> Self {
        let mut screen = Self::new();
        screen.set_error(message);
        screen
    }

    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn set_validating(&mut self) {
        self.state = LoginState::Validating;
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
    }

    /// Back to input after a failed attempt. The password is cleared.
    pub fn reset(&mut self) {
        self.state = LoginState::Input;
        self.password_input.clear();
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.email_input.set_focused(focus == Focus::Email);
        self.password_input.set_focused(focus == Focus::Password);
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::Password => LoginMode::Google,
            LoginMode::Google => LoginMode::Password,
        };
        self.google_input.set_focused(self.mode == LoginMode::Google);
        if self.mode == LoginMode::Password {
            self.set_focus(Focus::Email);
        } else {
            self.email_input.set_focused(false);
            self.password_input.set_focused(false);
        }
    }

    fn request(&self) -> Option<LoginRequest> {
        match self.mode {
            LoginMode::Password => {
                let email = self.email_input.value().trim();
                let password = self.password_input.value();
                (!email.is_empty() && !password.is_empty())
                    .then(|| LoginRequest::password(email, password))
            }
            LoginMode::Google => {
                let token = self.google_input.value().trim();
                (!token.is_empty()).then(|| LoginRequest::google(token))
            }
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match (self.mode, self.focus) {
            (LoginMode::Google, _) => &mut self.google_input,
            (LoginMode::Password, Focus::Email) => &mut self.email_input,
            (LoginMode::Password, Focus::Password) => &mut self.password_input,
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Validating {
            return LoginAction::None;
        }

        if self.state == LoginState::Error {
            self.reset();
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Char('n') if ctrl => return LoginAction::CreateAccount,
            KeyCode::Char('g') if ctrl => self.toggle_mode(),
            KeyCode::Enter => {
                if self.mode == LoginMode::Password && self.focus == Focus::Email {
                    self.set_focus(Focus::Password);
                } else if let Some(request) = self.request() {
                    return LoginAction::Submit(request);
                } else {
                    self.set_error("Enter your email and password.");
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up
                if self.mode == LoginMode::Password =>
            {
                let next = match self.focus {
                    Focus::Email => Focus::Password,
                    Focus::Password => Focus::Email,
                };
                self.set_focus(next);
            }
            _ => {
                self.focused_input().handle_key(key);
            }
        }

        LoginAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(15),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = vertical.areas(area);

        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(60),
            Constraint::Fill(1),
        ]);
        let [_, content_area, _] = horizontal.areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" CuraMetric Login ");

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [title, first, second, _, hints, _, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        let heading = match self.mode {
            LoginMode::Password => "Sign in with your email and password",
            LoginMode::Google => "Sign in with a Google account",
        };
        Paragraph::new(heading)
            .style(Style::default().fg(Color::White))
            .render(title, buf);

        match self.mode {
            LoginMode::Password => {
                (&self.email_input).render(first, buf);
                (&self.password_input).render(second, buf);
            }
            LoginMode::Google => (&self.google_input).render(first, buf),
        }

        let dim = Style::default().fg(Color::DarkGray);
        let other_mode = match self.mode {
            LoginMode::Password => "Ctrl+G: Google login",
            LoginMode::Google => "Ctrl+G: Email login",
        };
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Enter: Login", dim),
                Span::raw(" | "),
                Span::styled("Tab: Next field", dim),
                Span::raw(" | "),
                Span::styled("Esc: Quit", dim),
            ]),
            Line::from(vec![
                Span::styled(other_mode, dim),
                Span::raw(" | "),
                Span::styled("Ctrl+N: Create account", dim),
            ]),
        ])
        .render(hints, buf);

        let line = match self.state {
            LoginState::Input => Line::default(),
            LoginState::Validating => Line::from(Span::styled(
                "Signing in...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(msg, Style::default().fg(Color::Red)))
            }
        };
        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .render(status, buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
