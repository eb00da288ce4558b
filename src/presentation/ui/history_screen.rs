//! Wound-care history, oldest entry first.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::application::use_cases::WoundHistory;
use crate::domain::entities::{PatientId, WoundCare, WoundId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    None,
    Back,
    Reload,
    NewCare,
}

pub struct HistoryScreen {
    patient: PatientId,
    wound: WoundId,
    history: Option<WoundHistory>,
    scroll: u16,
    error: Option<String>,
}

impl HistoryScreen {
    #[must_use]
    pub const fn new(patient: PatientId, wound: WoundId) -> Self {
        Self {
            patient,
            wound,
            history: None,
            scroll: 0,
            error: None,
        }
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.patient
    }

    #[must_use]
    pub const fn wound(&self) -> WoundId {
        self.wound
    }

    /// Heading used by the wizard opened from here.
    #[must_use]
    pub fn heading(&self) -> Option<String> {
        self.history.as_ref().map(|history| {
            format!(
                "{} · {}",
                history.patient.full_name(),
                history.wound.location()
            )
        })
    }

    pub fn set_history(&mut self, history: WoundHistory) {
        self.history = Some(history);
        self.error = None;
        self.scroll = 0;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HistoryAction {
        match key.code {
            KeyCode::Esc => HistoryAction::Back,
            KeyCode::Char('r') | KeyCode::F(5) => HistoryAction::Reload,
            KeyCode::Char('n') => HistoryAction::NewCare,
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                HistoryAction::None
            }
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                HistoryAction::None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                HistoryAction::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                HistoryAction::None
            }
            KeyCode::Home => {
                self.scroll = 0;
                HistoryAction::None
            }
            _ => HistoryAction::None,
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "—" } else { value }
}

fn entry_lines(number: usize, entry: &WoundCare) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let date = entry
        .observed_on()
        .map_or_else(|| "undated".to_string(), |d| d.format("%d/%m/%Y").to_string());
    let dims = &entry.dimensions;
    let tissue = &entry.tissue;
    let dressing = |value: &Option<String>| value.clone().unwrap_or_else(|| "—".to_string());
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {name:<18}"), label), Span::raw(value)])
    };

    vec![
        Line::from(Span::styled(
            format!("#{number} · {date}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        row(
            "Size (cm)",
            format!(
                "{} × {} × {}  (area {:.1} cm²)",
                dims.width,
                dims.height,
                dims.depth,
                dims.area()
            ),
        ),
        row(
            "Tissue (%)",
            format!(
                "granulation {} · slough {} · necrotic {}",
                tissue.granulation, tissue.slough, tissue.necrotic
            ),
        ),
        row(
            "Surroundings",
            format!(
                "borders {} · skin {} · edema {}",
                or_dash(&entry.borders),
                or_dash(&entry.surrounding_skin),
                or_dash(&entry.edema)
            ),
        ),
        row(
            "Exudate",
            format!(
                "{} · {}",
                or_dash(&entry.exudate_amount),
                or_dash(&entry.exudate_type)
            ),
        ),
        row(
            "Dressings",
            format!(
                "{} / {}",
                dressing(&entry.primary_dressing),
                dressing(&entry.secondary_dressing)
            ),
        ),
        row(
            "Debridement",
            if entry.debridement { "Yes" } else { "No" }.to_string(),
        ),
        row(
            "Next care",
            entry
                .next_care_date
                .map_or_else(|| "—".to_string(), |d| d.format("%d/%m/%Y").to_string()),
        ),
        row("Notes", or_dash(&entry.care_notes).to_string()),
        Line::default(),
    ]
}

impl Widget for &HistoryScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header_area, entries_area, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let header = match &self.history {
            Some(history) => vec![
                Line::from(Span::styled(
                    history.patient.full_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "{} · {} · since {}",
                    history.wound.location(),
                    history.wound.origin().label(),
                    history.wound.origin_date().format("%d/%m/%Y")
                )),
            ],
            None => vec![Line::from("Loading history...")],
        };
        Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL).title(" Wound "))
            .render(header_area, buf);

        let lines: Vec<Line> = match &self.history {
            Some(history) if history.entries.is_empty() => vec![Line::styled(
                "No care entries yet. Press n to record one.",
                Style::default().fg(Color::DarkGray),
            )],
            Some(history) => history
                .entries
                .iter()
                .enumerate()
                .flat_map(|(index, entry)| entry_lines(index + 1, entry))
                .collect(),
            None => Vec::new(),
        };
        let count = self.history.as_ref().map_or(0, |h| h.entries.len());
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Care history ({count}) ")),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(entries_area, buf);

        let footer_line = match &self.error {
            Some(error) => Line::styled(
                format!("{error} (r to retry)"),
                Style::default().fg(Color::Red),
            ),
            None => Line::styled(
                "↑/↓: Scroll | n: New care entry | r: Reload | Esc: Back",
                Style::default().fg(Color::DarkGray),
            ),
        };
        Paragraph::new(footer_line).render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Patient, Wound, WoundOrigin};
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    fn entry() -> WoundCare {
        serde_json::from_str(
            r#"{"id": 3, "wound": 9, "care_date": "2024-05-20",
                "width": "4.0", "height": 2, "depth": 0.5,
                "granulation_tissue": 60, "slough": 30, "necrotic_tissue": 10,
                "borders": "Regulares", "primary_dressing": "Hidrogel",
                "debridement": true}"#,
        )
        .unwrap()
    }

    fn history() -> WoundHistory {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        WoundHistory {
            patient: Patient::new(4_u64, "Rosa", "Díaz", "11.111.111-1", date),
            wound: Wound::new(9_u64, 4_u64, "Talón", WoundOrigin::DiabeticFoot, date),
            entries: vec![entry()],
        }
    }

    #[test]
    fn test_entry_lines_summarize_observation() {
        let text: Vec<String> = entry_lines(1, &entry()).iter().map(ToString::to_string).collect();
        assert_eq!(text[0], "#1 · 20/05/2024");
        assert!(text[1].contains("4 × 2 × 0.5"));
        assert!(text[1].contains("area 8.0"));
        assert!(text[5].contains("Hidrogel / —"));
        assert!(text[6].ends_with("Yes"));
        assert!(text[8].ends_with("—"));
    }

    #[test]
    fn test_heading_available_once_loaded() {
        let mut screen = HistoryScreen::new(PatientId(4), WoundId(9));
        assert!(screen.heading().is_none());
        screen.set_history(history());
        assert_eq!(screen.heading().as_deref(), Some("Rosa Díaz · Talón"));
    }

    #[test]
    fn test_keys_map_to_actions_and_scroll() {
        let mut screen = HistoryScreen::new(PatientId(4), WoundId(9));
        screen.handle_key(key(KeyCode::Up));
        assert_eq!(screen.scroll, 0);
        screen.handle_key(key(KeyCode::PageDown));
        assert_eq!(screen.scroll, 10);
        assert_eq!(screen.handle_key(key(KeyCode::Char('n'))), HistoryAction::NewCare);
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), HistoryAction::Back);
    }
}
