//! Main application orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::application::dto::LoginRequest;
use crate::application::services::{SessionContext, SessionState};
use crate::application::use_cases::{
    CheckTokenUseCase, ClinicalRecordsUseCase, CreateAccountUseCase, LoginUseCase,
};
use crate::domain::entities::{PatientId, User, UserId, WoundId};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    AuthPort, ClinicalDataPort, NewAccount, NewPatient, NewWound, NewWoundCare, SessionStoragePort,
};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::ui::{
    AddWoundAction, AddWoundScreen, CreateAccountAction, CreateAccountScreen, HistoryAction,
    HistoryScreen, LoginAction, LoginScreen, NewPatientAction, NewPatientScreen,
    PatientDetailAction, PatientDetailScreen, PatientListAction, PatientListScreen,
    WoundCareAction, WoundCareScreen,
};
use crate::presentation::widgets::{Notice, StatusBar};

const NOTICE_TTL: Duration = Duration::from_secs(4);
const TICK_RATE: Duration = Duration::from_millis(250);

/// Work that needs the backend. The screen is redrawn in its loading state first.
#[derive(Debug)]
enum Command {
    Login(LoginRequest),
    CreateAccount(NewAccount),
    LoadPatients,
    LoadPatient(PatientId),
    LoadHistory(PatientId, WoundId),
    SavePatient(NewPatient),
    SaveWound(NewWound),
    SaveWoundCare(NewWoundCare),
    Logout,
}

impl Command {
    const fn loading_label(&self) -> &'static str {
        match self {
            Self::Login(_) => "Signing in...",
            Self::CreateAccount(_) => "Creating account...",
            Self::LoadPatients => "Loading patients...",
            Self::LoadPatient(_) => "Loading patient...",
            Self::LoadHistory(..) => "Loading history...",
            Self::SavePatient(_) | Self::SaveWound(_) | Self::SaveWoundCare(_) => "Saving...",
            Self::Logout => "Signing out...",
        }
    }
}

enum CurrentScreen {
    Login(LoginScreen),
    CreateAccount(CreateAccountScreen),
    PatientList(PatientListScreen),
    PatientDetail(PatientDetailScreen),
    NewPatient(NewPatientScreen),
    AddWound(AddWoundScreen),
    WoundCare(WoundCareScreen),
    History(HistoryScreen),
}

enum ScreenAction {
    Login(LoginAction),
    CreateAccount(CreateAccountAction),
    PatientList(PatientListAction),
    PatientDetail(PatientDetailAction),
    NewPatient(NewPatientAction),
    AddWound(AddWoundAction),
    WoundCare(WoundCareAction),
    History(HistoryAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Exiting,
}

/// Owns the session, the screen stack and the backend use cases.
pub struct App {
    state: AppState,
    screen: CurrentScreen,
    back_stack: Vec<CurrentScreen>,
    session: SessionContext,
    login_use_case: LoginUseCase,
    create_account_use_case: CreateAccountUseCase,
    check_token_use_case: CheckTokenUseCase,
    records: ClinicalRecordsUseCase,
    loading: Option<&'static str>,
    notice: Option<(Notice, Instant)>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    /// Starts on the login screen until the stored session is checked.
    #[must_use]
    pub fn new(
        auth_port: Arc<dyn AuthPort>,
        data_port: Arc<dyn ClinicalDataPort>,
        storage_port: Arc<dyn SessionStoragePort>,
    ) -> Self {
        Self {
            state: AppState::Running,
            screen: CurrentScreen::Login(LoginScreen::new()),
            back_stack: Vec::new(),
            session: SessionContext::new(storage_port),
            login_use_case: LoginUseCase::new(auth_port.clone()),
            create_account_use_case: CreateAccountUseCase::new(auth_port.clone()),
            check_token_use_case: CheckTokenUseCase::new(auth_port),
            records: ClinicalRecordsUseCase::new(data_port),
            loading: None,
            notice: None,
        }
    }

    /// # Errors
    /// Returns error if drawing or reading terminal events fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.loading = Some("Checking session...");
        terminal.draw(|frame| self.render(frame))?;
        self.restore_session().await;
        self.loading = None;

        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    /// Launch guard: a verified session opens the patient list, anything else the login screen.
    async fn restore_session(&mut self) {
        match self.check_token_use_case.execute(&mut self.session).await {
            SessionState::Authenticated => {
                info!("Session restored");
                self.reset_to(CurrentScreen::PatientList(PatientListScreen::new()));
                self.load_patients().await;
            }
            state => {
                debug!(?state, "No usable session, showing login");
                self.reset_to(CurrentScreen::Login(LoginScreen::new()));
            }
        }
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            tokio::select! {
                maybe_event = terminal_events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if let Some(command) = self.handle_terminal_event(event) {
                                self.run_command(terminal, command).await?;
                            }
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Terminal event stream failed");
                            return Err(e.into());
                        }
                        None => self.state = AppState::Exiting,
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = tick.tick() => {
                    if self.expire_notice() {
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) if EventHandler::is_press(&key) => {
                if EventHandler::is_quit_event(&key) {
                    self.state = AppState::Exiting;
                    return None;
                }
                let (result, command) = self.handle_key(key);
                if result == EventResult::Exit {
                    self.state = AppState::Exiting;
                }
                command
            }
            _ => None,
        }
    }

    async fn run_command(
        &mut self,
        terminal: &mut DefaultTerminal,
        command: Command,
    ) -> color_eyre::Result<()> {
        self.loading = Some(command.loading_label());
        if let CurrentScreen::Login(screen) = &mut self.screen {
            screen.set_validating();
        }
        terminal.draw(|frame| self.render(frame))?;
        self.execute(command).await;
        self.loading = None;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> (EventResult, Option<Command>) {
        let action = match &mut self.screen {
            CurrentScreen::Login(screen) => ScreenAction::Login(screen.handle_key(key)),
            CurrentScreen::CreateAccount(screen) => {
                ScreenAction::CreateAccount(screen.handle_key(key))
            }
            CurrentScreen::PatientList(screen) => ScreenAction::PatientList(screen.handle_key(key)),
            CurrentScreen::PatientDetail(screen) => {
                ScreenAction::PatientDetail(screen.handle_key(key))
            }
            CurrentScreen::NewPatient(screen) => ScreenAction::NewPatient(screen.handle_key(key)),
            CurrentScreen::AddWound(screen) => ScreenAction::AddWound(screen.handle_key(key)),
            CurrentScreen::WoundCare(screen) => ScreenAction::WoundCare(screen.handle_key(key)),
            CurrentScreen::History(screen) => ScreenAction::History(screen.handle_key(key)),
        };
        self.apply(action)
    }

    fn apply(&mut self, action: ScreenAction) -> (EventResult, Option<Command>) {
        let command = match action {
            ScreenAction::Login(action) => match action {
                LoginAction::None => None,
                LoginAction::Submit(request) => Some(Command::Login(request)),
                LoginAction::CreateAccount => {
                    self.push(CurrentScreen::CreateAccount(CreateAccountScreen::new()));
                    None
                }
                LoginAction::Quit => return (EventResult::Exit, None),
            },
            ScreenAction::CreateAccount(action) => match action {
                CreateAccountAction::None => None,
                CreateAccountAction::Submit(account) => Some(Command::CreateAccount(account)),
                CreateAccountAction::Back => self.pop(),
            },
            ScreenAction::PatientList(action) => match action {
                PatientListAction::None => None,
                PatientListAction::Open(patient) => {
                    self.push(CurrentScreen::PatientDetail(PatientDetailScreen::new(
                        patient,
                        today(),
                    )));
                    Some(Command::LoadPatient(patient))
                }
                PatientListAction::NewPatient => self.with_author(|author| {
                    CurrentScreen::NewPatient(NewPatientScreen::new(author, today()))
                }),
                PatientListAction::Refresh => Some(Command::LoadPatients),
                PatientListAction::Logout => Some(Command::Logout),
                PatientListAction::Quit => return (EventResult::Exit, None),
            },
            ScreenAction::PatientDetail(action) => self.apply_detail(action),
            ScreenAction::NewPatient(action) => match action {
                NewPatientAction::None => None,
                NewPatientAction::Submit(patient) => Some(Command::SavePatient(patient)),
                NewPatientAction::Back => self.pop(),
            },
            ScreenAction::AddWound(action) => match action {
                AddWoundAction::None => None,
                AddWoundAction::Submit(wound) => Some(Command::SaveWound(wound)),
                AddWoundAction::Back => self.pop(),
            },
            ScreenAction::WoundCare(action) => match action {
                WoundCareAction::None => None,
                WoundCareAction::Submit(care) => Some(Command::SaveWoundCare(care)),
                WoundCareAction::Back => self.pop(),
            },
            ScreenAction::History(action) => self.apply_history(action),
        };
        (EventResult::Continue, command)
    }

    fn apply_detail(&mut self, action: PatientDetailAction) -> Option<Command> {
        let CurrentScreen::PatientDetail(screen) = &self.screen else {
            return None;
        };
        let patient = screen.patient_id();
        match action {
            PatientDetailAction::None => None,
            PatientDetailAction::Back => self.pop(),
            PatientDetailAction::Reload => Some(Command::LoadPatient(patient)),
            PatientDetailAction::AddWound => {
                let name = screen.patient_name().unwrap_or_default();
                self.with_author(|author| {
                    CurrentScreen::AddWound(AddWoundScreen::new(patient, name, author, today()))
                })
            }
            PatientDetailAction::History(wound) => {
                self.push(CurrentScreen::History(HistoryScreen::new(patient, wound)));
                Some(Command::LoadHistory(patient, wound))
            }
            PatientDetailAction::NewCare(wound) => {
                let heading = screen.wound_heading(wound);
                self.with_author(|author| {
                    CurrentScreen::WoundCare(WoundCareScreen::new(
                        patient,
                        wound,
                        heading,
                        author,
                        today(),
                    ))
                })
            }
        }
    }

    fn apply_history(&mut self, action: HistoryAction) -> Option<Command> {
        let CurrentScreen::History(screen) = &self.screen else {
            return None;
        };
        let (patient, wound) = (screen.patient(), screen.wound());
        match action {
            HistoryAction::None => None,
            HistoryAction::Back => self.pop(),
            HistoryAction::Reload => Some(Command::LoadHistory(patient, wound)),
            HistoryAction::NewCare => {
                let heading = screen.heading().unwrap_or_default();
                self.with_author(|author| {
                    CurrentScreen::WoundCare(WoundCareScreen::new(
                        patient,
                        wound,
                        heading,
                        author,
                        today(),
                    ))
                })
            }
        }
    }

    /// Opens a form that records its author. Without a profile the session is unusable.
    fn with_author(&mut self, open: impl FnOnce(UserId) -> CurrentScreen) -> Option<Command> {
        match self.session.user().map(User::id) {
            Some(author) => {
                self.push(open(author));
                None
            }
            None => {
                warn!("Session has no user profile, logging out");
                Some(Command::Logout)
            }
        }
    }

    fn push(&mut self, screen: CurrentScreen) {
        let previous = std::mem::replace(&mut self.screen, screen);
        self.back_stack.push(previous);
    }

    /// Returns to the previous screen. The bottom screen stays put.
    fn pop(&mut self) -> Option<Command> {
        if let Some(previous) = self.back_stack.pop() {
            self.screen = previous;
        }
        None
    }

    fn reset_to(&mut self, screen: CurrentScreen) {
        self.back_stack.clear();
        self.screen = screen;
    }

    fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    fn expire_notice(&mut self) -> bool {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= NOTICE_TTL);
        if expired {
            self.notice = None;
        }
        expired
    }

    async fn execute(&mut self, command: Command) {
        debug!(?command, "Executing command");
        match command {
            Command::Login(request) => {
                match self.login_use_case.execute(request, &mut self.session).await {
                    Ok(response) => {
                        let name = response.user.display_name();
                        self.open_patient_list(format!("Welcome, {name}")).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "Login failed");
                        if let CurrentScreen::Login(screen) = &mut self.screen {
                            screen.set_error(e.user_message());
                        }
                    }
                }
            }
            Command::CreateAccount(account) => {
                match self
                    .create_account_use_case
                    .execute(&account, &mut self.session)
                    .await
                {
                    Ok(response) => {
                        let name = response.user.display_name();
                        self.open_patient_list(format!("Account created. Welcome, {name}"))
                            .await;
                    }
                    Err(e) => {
                        warn!(error = %e, "Account creation failed");
                        if let CurrentScreen::CreateAccount(screen) = &mut self.screen {
                            screen.set_error(e.user_message());
                        }
                    }
                }
            }
            Command::LoadPatients => self.load_patients().await,
            Command::LoadPatient(patient) => self.load_patient(patient).await,
            Command::LoadHistory(patient, wound) => self.load_history(patient, wound).await,
            Command::SavePatient(patient) => {
                match self.records.register_patient(&self.session, &patient).await {
                    Ok(created) => {
                        let id = created.id();
                        self.pop();
                        if let CurrentScreen::PatientList(list) = &mut self.screen {
                            list.add_patient(created);
                        }
                        self.push(CurrentScreen::PatientDetail(PatientDetailScreen::new(
                            id,
                            today(),
                        )));
                        self.set_notice(Notice::success("Patient registered"));
                        self.load_patient(id).await;
                    }
                    Err(e) => self.handle_api_error(e).await,
                }
            }
            Command::SaveWound(wound) => {
                match self.records.register_wound(&self.session, &wound).await {
                    Ok(created) => {
                        self.pop();
                        self.set_notice(Notice::success("Wound registered"));
                        self.load_patient(created.patient()).await;
                    }
                    Err(e) => self.handle_api_error(e).await,
                }
            }
            Command::SaveWoundCare(care) => {
                match self.records.record_wound_care(&self.session, &care).await {
                    Ok(_) => {
                        let (patient, wound) = (care.patient, care.wound);
                        self.pop();
                        self.show_history(patient, wound);
                        self.set_notice(Notice::success("Wound care saved"));
                        self.load_history(patient, wound).await;
                    }
                    Err(e) => self.handle_api_error(e).await,
                }
            }
            Command::Logout => {
                self.session.logout().await;
                info!("Logged out");
                self.reset_to(CurrentScreen::Login(LoginScreen::new()));
                self.set_notice(Notice::info("Signed out"));
            }
        }
    }

    /// Saved entries are shown in the wound's history, reusing it when it is already open.
    fn show_history(&mut self, patient: PatientId, wound: WoundId) {
        let showing = matches!(
            &self.screen,
            CurrentScreen::History(screen) if screen.wound() == wound
        );
        if !showing {
            self.push(CurrentScreen::History(HistoryScreen::new(patient, wound)));
        }
    }

    async fn open_patient_list(&mut self, greeting: String) {
        self.reset_to(CurrentScreen::PatientList(PatientListScreen::new()));
        self.set_notice(Notice::success(greeting));
        self.load_patients().await;
    }

    async fn load_patients(&mut self) {
        match self.records.list_patients(&self.session).await {
            Ok(patients) => {
                if let CurrentScreen::PatientList(screen) = &mut self.screen {
                    screen.set_patients(patients);
                }
            }
            Err(e) => self.handle_api_error(e).await,
        }
    }

    async fn load_patient(&mut self, patient: PatientId) {
        match self.records.patient_record(&self.session, patient).await {
            Ok(record) => {
                if let CurrentScreen::PatientDetail(screen) = &mut self.screen {
                    screen.set_record(record);
                }
            }
            Err(e) => self.handle_api_error(e).await,
        }
    }

    async fn load_history(&mut self, patient: PatientId, wound: WoundId) {
        match self.records.wound_history(&self.session, patient, wound).await {
            Ok(history) => {
                if let CurrentScreen::History(screen) = &mut self.screen {
                    screen.set_history(history);
                }
            }
            Err(e) => self.handle_api_error(e).await,
        }
    }

    /// Authentication failures end the session; anything else is shown on the current screen.
    async fn handle_api_error(&mut self, error: ApiError) {
        let message = error.user_message();
        if error.requires_logout() {
            warn!(error = %error, "Request rejected, forcing logout");
            self.session.logout().await;
            self.reset_to(CurrentScreen::Login(LoginScreen::with_error(message)));
            return;
        }

        error!(error = %error, recoverable = error.is_recoverable(), "Request failed");
        match &mut self.screen {
            CurrentScreen::Login(screen) => screen.set_error(message),
            CurrentScreen::CreateAccount(screen) => screen.set_error(message),
            CurrentScreen::PatientList(screen) => screen.set_error(message),
            CurrentScreen::PatientDetail(screen) => screen.set_error(message),
            CurrentScreen::NewPatient(screen) => screen.set_error(message),
            CurrentScreen::AddWound(screen) => screen.set_error(message),
            CurrentScreen::WoundCare(screen) => screen.set_error(message),
            CurrentScreen::History(screen) => screen.set_error(message),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        match &mut self.screen {
            CurrentScreen::Login(screen) => frame.render_widget(&*screen, main),
            CurrentScreen::CreateAccount(screen) => frame.render_widget(&*screen, main),
            CurrentScreen::PatientList(screen) => frame.render_widget(screen, main),
            CurrentScreen::PatientDetail(screen) => frame.render_widget(screen, main),
            CurrentScreen::NewPatient(screen) => frame.render_widget(screen, main),
            CurrentScreen::AddWound(screen) => frame.render_widget(&*screen, main),
            CurrentScreen::WoundCare(screen) => frame.render_widget(&*screen, main),
            CurrentScreen::History(screen) => frame.render_widget(&*screen, main),
        }

        let name = self.session.user().map(User::display_name);
        frame.render_widget(
            StatusBar::new("Ctrl+C: Quit")
                .session(name.as_deref())
                .notice(self.notice.as_ref().map(|(notice, _)| notice)),
            status,
        );

        if let Some(label) = self.loading {
            Self::render_loading(frame, main, label);
        }
    }

    fn render_loading(frame: &mut Frame, area: Rect, label: &str) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, popup, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(32),
            Constraint::Fill(1),
        ])
        .areas(middle);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(label)
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::ITALIC),
                )
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Patient, Wound, WoundOrigin};
    use crate::domain::ports::MockClinicalDataPort;
    use crate::domain::ports::mocks::{
        MockAuthPort, MockSessionStorage, VALID_EMAIL, VALID_PASSWORD,
    };
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn birth() -> NaiveDate {
        NaiveDate::from_ymd_opt(1950, 3, 1).unwrap()
    }

    fn app_with(
        auth: MockAuthPort,
        data: MockClinicalDataPort,
        storage: Arc<MockSessionStorage>,
    ) -> App {
        App::new(Arc::new(auth), Arc::new(data), storage)
    }

    fn signed_in_storage() -> Arc<MockSessionStorage> {
        Arc::new(MockSessionStorage::with_session(
            MockAuthPort::token(),
            Some(User::new(7_u64, "Ana", "Rojas", VALID_EMAIL)),
        ))
    }

    #[tokio::test]
    async fn test_launch_with_valid_session_opens_patient_list() {
        let mut data = MockClinicalDataPort::new();
        data.expect_list_patients()
            .times(1)
            .returning(|_| Ok(vec![Patient::new(1_u64, "Rosa", "Díaz", "11.111.111-1", birth())]));
        let mut app = app_with(MockAuthPort::new(true), data, signed_in_storage());

        app.restore_session().await;

        assert!(app.session.is_authenticated());
        match &app.screen {
            CurrentScreen::PatientList(screen) => assert_eq!(screen.visible().len(), 1),
            _ => panic!("expected patient list"),
        }
    }

    #[tokio::test]
    async fn test_launch_with_rejected_token_shows_login_and_clears_storage() {
        let storage = signed_in_storage();
        let mut app = app_with(
            MockAuthPort::new(false),
            MockClinicalDataPort::new(),
            storage.clone(),
        );

        app.restore_session().await;

        assert!(matches!(app.screen, CurrentScreen::Login(_)));
        assert!(!app.session.is_authenticated());
        assert!(storage.snapshot().await.token.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_response_forces_logout() {
        let storage = signed_in_storage();
        let mut data = MockClinicalDataPort::new();
        data.expect_list_patients()
            .returning(|_| Err(ApiError::unauthorized("token expired")));
        let mut app = app_with(MockAuthPort::new(true), data, storage.clone());
        app.restore_session().await;

        assert!(matches!(app.screen, CurrentScreen::Login(_)));
        assert!(app.back_stack.is_empty());
        assert!(!app.session.is_authenticated());
        assert!(storage.snapshot().await.token.is_none());
    }

    #[tokio::test]
    async fn test_server_error_keeps_session_and_shows_retry() {
        let mut data = MockClinicalDataPort::new();
        data.expect_list_patients()
            .returning(|_| Err(ApiError::server(500, "boom")));
        let mut app = app_with(MockAuthPort::new(true), data, signed_in_storage());
        app.restore_session().await;

        assert!(app.session.is_authenticated());
        assert!(matches!(app.screen, CurrentScreen::PatientList(_)));
    }

    #[tokio::test]
    async fn test_login_then_logout_round_trip() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut data = MockClinicalDataPort::new();
        data.expect_list_patients().returning(|_| Ok(Vec::new()));
        let mut app = app_with(MockAuthPort::new(true), data, storage.clone());

        app.execute(Command::Login(LoginRequest::password(VALID_EMAIL, VALID_PASSWORD)))
            .await;
        assert!(matches!(app.screen, CurrentScreen::PatientList(_)));
        assert_eq!(app.session.user().map(User::first_name), Some("Ana"));
        assert!(storage.snapshot().await.token.is_some());

        let (_, command) = app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        let command = command.expect("logout command");
        app.execute(command).await;

        assert!(matches!(app.screen, CurrentScreen::Login(_)));
        assert!(!app.session.is_authenticated());
        assert!(storage.snapshot().await.token.is_none());
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_login_screen() {
        let mut app = app_with(
            MockAuthPort::new(true),
            MockClinicalDataPort::new(),
            Arc::new(MockSessionStorage::new()),
        );

        app.execute(Command::Login(LoginRequest::password(VALID_EMAIL, "wrong")))
            .await;

        match &app.screen {
            CurrentScreen::Login(screen) => {
                assert_eq!(screen.state(), crate::presentation::ui::LoginState::Error);
            }
            _ => panic!("expected login screen"),
        }
    }

    #[tokio::test]
    async fn test_navigation_stack_push_and_back() {
        let mut data = MockClinicalDataPort::new();
        data.expect_list_patients()
            .returning(|_| Ok(vec![Patient::new(1_u64, "Rosa", "Díaz", "11.111.111-1", birth())]));
        let mut app = app_with(MockAuthPort::new(true), data, signed_in_storage());
        app.restore_session().await;

        let (_, command) = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(command, Some(Command::LoadPatient(PatientId(1)))));
        assert!(matches!(app.screen, CurrentScreen::PatientDetail(_)));

        let (_, command) = app.handle_key(key(KeyCode::Esc));
        assert!(command.is_none());
        assert!(matches!(app.screen, CurrentScreen::PatientList(_)));

        let (_, command) = app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert!(command.is_none());
        assert!(matches!(app.screen, CurrentScreen::NewPatient(_)));
    }

    fn new_care(patient: PatientId, wound: WoundId) -> NewWoundCare {
        NewWoundCare {
            wound,
            patient,
            care_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            dimensions: Default::default(),
            tissue: Default::default(),
            borders: String::new(),
            surrounding_skin: String::new(),
            edema: String::new(),
            exudate_amount: String::new(),
            exudate_type: String::new(),
            debridement: false,
            primary_dressing: None,
            secondary_dressing: None,
            next_care_date: None,
            care_notes: String::new(),
            wound_pain: String::new(),
            skin_protection: String::new(),
            cleaning_solution: String::new(),
            created_by: UserId(7),
            updated_by: UserId(7),
        }
    }

    fn saved_entry() -> crate::domain::entities::WoundCare {
        serde_json::from_str(
            r#"{"id": 3, "wound": 9, "care_date": "2024-06-01",
                "width": 3, "height": 2, "depth": 1,
                "granulation_tissue": 50, "slough": 30, "necrotic_tissue": 20}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_saved_care_from_patient_detail_opens_history() {
        let mut data = MockClinicalDataPort::new();
        data.expect_create_wound_care()
            .times(1)
            .returning(|_, _| Ok(saved_entry()));
        data.expect_get_patient()
            .returning(|_, id| Ok(Patient::new(id, "Rosa", "Díaz", "11.111.111-1", birth())));
        data.expect_get_wound().returning(|_, id| {
            Ok(Wound::new(id, 4_u64, "Talón", WoundOrigin::DiabeticFoot, birth()))
        });
        data.expect_list_wound_cares()
            .times(1)
            .returning(|_, _| Ok(vec![saved_entry()]));
        let mut app = app_with(MockAuthPort::new(true), data, signed_in_storage());
        app.session.restore(MockAuthPort::token(), User::new(7_u64, "Ana", "Rojas", VALID_EMAIL));
        app.reset_to(CurrentScreen::PatientList(PatientListScreen::new()));
        app.push(CurrentScreen::PatientDetail(PatientDetailScreen::new(PatientId(4), today())));
        app.push(CurrentScreen::WoundCare(WoundCareScreen::new(
            PatientId(4),
            WoundId(9),
            "Rosa Díaz · Talón".to_string(),
            UserId(7),
            today(),
        )));

        app.execute(Command::SaveWoundCare(new_care(PatientId(4), WoundId(9))))
            .await;

        match &app.screen {
            CurrentScreen::History(screen) => {
                assert_eq!(screen.wound(), WoundId(9));
                assert_eq!(screen.heading().as_deref(), Some("Rosa Díaz · Talón"));
            }
            _ => panic!("expected history screen"),
        }
        assert!(matches!(app.back_stack.last(), Some(CurrentScreen::PatientDetail(_))));
        assert_eq!(app.back_stack.len(), 2);
    }

    #[tokio::test]
    async fn test_saved_care_from_history_reuses_it() {
        let mut data = MockClinicalDataPort::new();
        data.expect_create_wound_care()
            .returning(|_, _| Ok(saved_entry()));
        data.expect_get_patient()
            .returning(|_, id| Ok(Patient::new(id, "Rosa", "Díaz", "11.111.111-1", birth())));
        data.expect_get_wound().returning(|_, id| {
            Ok(Wound::new(id, 4_u64, "Talón", WoundOrigin::DiabeticFoot, birth()))
        });
        data.expect_list_wound_cares()
            .returning(|_, _| Ok(vec![saved_entry()]));
        let mut app = app_with(MockAuthPort::new(true), data, signed_in_storage());
        app.session.restore(MockAuthPort::token(), User::new(7_u64, "Ana", "Rojas", VALID_EMAIL));
        app.reset_to(CurrentScreen::History(HistoryScreen::new(PatientId(4), WoundId(9))));
        app.push(CurrentScreen::WoundCare(WoundCareScreen::new(
            PatientId(4),
            WoundId(9),
            String::new(),
            UserId(7),
            today(),
        )));

        app.execute(Command::SaveWoundCare(new_care(PatientId(4), WoundId(9))))
            .await;

        assert!(matches!(app.screen, CurrentScreen::History(_)));
        assert!(app.back_stack.is_empty());
    }

    #[test]
    fn test_quit_from_login() {
        let mut app = app_with(
            MockAuthPort::new(true),
            MockClinicalDataPort::new(),
            Arc::new(MockSessionStorage::new()),
        );
        let (result, command) = app.handle_key(key(KeyCode::Esc));
        assert_eq!(result, EventResult::Exit);
        assert!(command.is_none());
    }
}
