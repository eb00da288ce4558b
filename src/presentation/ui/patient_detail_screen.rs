//! Patient demographics, conditions and wounds.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::application::use_cases::PatientRecord;
use crate::domain::entities::{PatientId, WoundId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientDetailAction {
    None,
    Back,
    Reload,
    AddWound,
    History(WoundId),
    NewCare(WoundId),
}

pub struct PatientDetailScreen {
    patient_id: PatientId,
    record: Option<PatientRecord>,
    wounds_state: ListState,
    today: NaiveDate,
    error: Option<String>,
}

impl PatientDetailScreen {
    #[must_use]
    pub fn new(patient_id: PatientId, today: NaiveDate) -> Self {
        Self {
            patient_id,
            record: None,
            wounds_state: ListState::default(),
            today,
            error: None,
        }
    }

    #[must_use]
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    #[must_use]
    pub fn patient_name(&self) -> Option<String> {
        self.record.as_ref().map(|record| record.patient.full_name())
    }

    /// "Patient · wound location" for the wizard title.
    #[must_use]
    pub fn wound_heading(&self, wound: WoundId) -> String {
        let Some(record) = &self.record else {
            return String::new();
        };
        let location = record
            .wounds
            .iter()
            .find(|w| w.id() == wound)
            .map_or("", |w| w.location());
        format!("{} · {location}", record.patient.full_name())
    }

    pub fn set_record(&mut self, record: PatientRecord) {
        let selected = (!record.wounds.is_empty()).then_some(0);
        self.wounds_state.select(selected);
        self.record = Some(record);
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn selected_wound(&self) -> Option<WoundId> {
        let record = self.record.as_ref()?;
        let index = self.wounds_state.selected()?;
        record.wounds.get(index).map(|wound| wound.id())
    }

    fn wound_count(&self) -> usize {
        self.record.as_ref().map_or(0, |record| record.wounds.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PatientDetailAction {
        match key.code {
            KeyCode::Esc => PatientDetailAction::Back,
            KeyCode::Char('r') | KeyCode::F(5) => PatientDetailAction::Reload,
            KeyCode::Char('a') if self.record.is_some() => PatientDetailAction::AddWound,
            KeyCode::Up => {
                let current = self.wounds_state.selected().unwrap_or(0);
                if self.wound_count() > 0 {
                    self.wounds_state.select(Some(current.saturating_sub(1)));
                }
                PatientDetailAction::None
            }
            KeyCode::Down => {
                let count = self.wound_count();
                if count > 0 {
                    let current = self.wounds_state.selected().unwrap_or(0);
                    self.wounds_state.select(Some((current + 1).min(count - 1)));
                }
                PatientDetailAction::None
            }
            KeyCode::Enter => self
                .selected_wound()
                .map_or(PatientDetailAction::None, PatientDetailAction::History),
            KeyCode::Char('n') => self
                .selected_wound()
                .map_or(PatientDetailAction::None, PatientDetailAction::NewCare),
            _ => PatientDetailAction::None,
        }
    }

    fn demographics(&self, record: &PatientRecord) -> Vec<Line<'static>> {
        let patient = &record.patient;
        let label = Style::default().fg(Color::Gray);
        let age = patient
            .age_on(self.today)
            .map_or_else(|| "unknown".to_string(), |years| format!("{years} years"));
        let list_or_none = |items: &[String]| {
            if items.is_empty() {
                "None".to_string()
            } else {
                items.join(", ")
            }
        };

        vec![
            Line::from(Span::styled(
                patient.full_name(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("RUT: ", label),
                Span::raw(patient.rut().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Birth date: ", label),
                Span::raw(format!("{} ({age})", patient.birth_date().format("%d/%m/%Y"))),
            ]),
            Line::from(vec![
                Span::styled("Chronic diseases: ", label),
                Span::raw(list_or_none(patient.chronic_diseases())),
            ]),
            Line::from(vec![
                Span::styled("Predispositions: ", label),
                Span::raw(list_or_none(patient.predispositions())),
            ]),
        ]
    }
}

impl Widget for &mut PatientDetailScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [info_area, wounds_area, footer] = Layout::vertical([
            Constraint::Length(8),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let info_block = Block::default().borders(Borders::ALL).title(" Patient ");
        let Some(record) = &self.record else {
            Paragraph::new("Loading patient...")
                .block(info_block)
                .render(info_area, buf);
            if let Some(error) = &self.error {
                Paragraph::new(Line::styled(
                    format!("{error} (r to retry)"),
                    Style::default().fg(Color::Red),
                ))
                .render(footer, buf);
            }
            return;
        };

        Paragraph::new(self.demographics(record))
            .block(info_block)
            .wrap(Wrap { trim: true })
            .render(info_area, buf);

        let items: Vec<ListItem> = record
            .wounds
            .iter()
            .map(|wound| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{:<5}", wound.id().as_u64()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{:<28}", wound.location()),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("{:<20}", wound.origin().label()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(format!("since {}", wound.origin_date().format("%d/%m/%Y"))),
                ]))
            })
            .collect();
        let title = format!(" Wounds ({}) ", items.len());
        let empty = items.is_empty();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("› ");
        StatefulWidget::render(list, wounds_area, buf, &mut self.wounds_state);

        if empty {
            let inner = Rect {
                x: wounds_area.x + 2,
                y: wounds_area.y + 1,
                width: wounds_area.width.saturating_sub(4),
                height: 1,
            };
            Paragraph::new("No wounds recorded. Press a to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
        }

        let footer_line = match &self.error {
            Some(error) => Line::styled(
                format!("{error} (r to retry)"),
                Style::default().fg(Color::Red),
            ),
            None => Line::styled(
                "Enter: History | n: New care entry | a: Add wound | r: Reload | Esc: Back",
                Style::default().fg(Color::DarkGray),
            ),
        };
        Paragraph::new(footer_line).render(footer, buf);
    }
}
