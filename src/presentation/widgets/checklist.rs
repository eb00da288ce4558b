//! Multi-select list with a cursor.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

/// Cursor over a fixed set of options. Selection is owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct ChecklistState {
    list_state: ListState,
}

impl ChecklistState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.list_state.select(Some((self.cursor() + 1) % len));
        }
    }

    pub fn previous(&mut self, len: usize) {
        if len > 0 {
            self.list_state
                .select(Some((self.cursor() + len - 1) % len));
        }
    }
}

/// Renders `[x]`/`[ ]` rows for each option.
pub struct Checklist<'a> {
    title: &'a str,
    options: &'a [&'a str],
    is_checked: &'a dyn Fn(&str) -> bool,
    focused: bool,
}

impl<'a> Checklist<'a> {
    #[must_use]
    pub fn new(title: &'a str, options: &'a [&'a str], is_checked: &'a dyn Fn(&str) -> bool) -> Self {
        Self {
            title,
            options,
            is_checked,
            focused: false,
        }
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl StatefulWidget for Checklist<'_> {
    type State = ChecklistState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border = if self.focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(self.title);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|option| {
                let checked = (self.is_checked)(option);
                let mark = if checked { "[x] " } else { "[ ] " };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Yellow)),
                    Span::raw(*option),
                ]))
            })
            .collect();

        let highlight = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let list = List::new(items).block(block).highlight_style(highlight);
        StatefulWidget::render(list, area, buf, &mut state.list_state);
    }
}
