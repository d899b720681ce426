use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::SavedListing;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Bookmarked app ids, persisted across runs. Selecting one loads it in
/// the market view.
pub struct SavedView {
    pub entries: Vec<SavedListing>,
    pub selected: usize,
    table_state: TableState,
    scroll_state: ScrollbarState,
}

impl SavedView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
            table_state: TableState::default().with_selected(0),
            scroll_state: ScrollbarState::default(),
        }
    }

    pub fn set_entries(&mut self, entries: Vec<SavedListing>) {
        if self.selected >= entries.len() {
            self.selected = entries.len().saturating_sub(1);
            self.table_state.select(Some(self.selected));
        }
        self.entries = entries;
    }

    fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let next = if self.selected + 1 >= self.entries.len() {
            self.selected
        } else {
            self.selected + 1
        };
        self.selected = next;
        self.table_state.select(Some(next));
        self.scroll_state = self.scroll_state.position(next);
    }

    fn select_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let prev = self.selected.saturating_sub(1);
        self.selected = prev;
        self.table_state.select(Some(prev));
        self.scroll_state = self.scroll_state.position(prev);
    }
}

impl Component for SavedView {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') => {
                if !self.entries.is_empty() {
                    self.selected = 0;
                    self.table_state.select(Some(0));
                    self.scroll_state = self.scroll_state.position(0);
                }
                None
            }
            KeyCode::Char('G') => {
                if !self.entries.is_empty() {
                    let last = self.entries.len() - 1;
                    self.selected = last;
                    self.table_state.select(Some(last));
                    self.scroll_state = self.scroll_state.position(last);
                }
                None
            }
            KeyCode::Char('d') => self
                .entries
                .get(self.selected)
                .map(|e| AppEvent::RemoveSaved(e.app_id)),
            KeyCode::Enter => self
                .entries
                .get(self.selected)
                .map(|e| AppEvent::OpenListing(e.app_id)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer_block = Block::default()
            .title(" Saved Listings ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());

        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        if self.entries.is_empty() {
            let text = Paragraph::new(
                "No saved listings.\n\nPress 's' on a loaded listing to bookmark it.",
            )
            .style(THEME.muted_style())
            .alignment(Alignment::Center);
            frame.render_widget(text, inner);
            return;
        }

        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("App ID"),
            Cell::from("Label"),
            Cell::from("Added"),
        ])
        .style(THEME.table_header_style())
        .bottom_margin(0);

        let rows: Vec<Row> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(format!("{}", entry.app_id)).style(THEME.accent_style()),
                    Cell::from(entry.label.clone()),
                    Cell::from(utils::format_time_ago(entry.added_at)).style(THEME.muted_style()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(12),
        ];

        self.scroll_state = self.scroll_state.content_length(self.entries.len());

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::NONE))
            .row_highlight_style(THEME.selected_style())
            .highlight_symbol(" > ");

        frame.render_stateful_widget(table, inner, &mut self.table_state);

        if self.entries.len() > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v"));

            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };

            frame.render_stateful_widget(scrollbar, scrollbar_area, &mut self.scroll_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn saved(app_id: u64) -> SavedListing {
        SavedListing {
            app_id,
            label: format!("App {app_id}"),
            added_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_enter_opens_selected_listing() {
        let mut view = SavedView::new();
        view.set_entries(vec![saved(42), saved(77)]);
        view.handle_key(key(KeyCode::Char('j')));

        match view.handle_key(key(KeyCode::Enter)) {
            Some(AppEvent::OpenListing(77)) => {}
            other => panic!("expected OpenListing(77), got {other:?}"),
        }
    }

    #[test]
    fn test_delete_emits_remove_for_selected() {
        let mut view = SavedView::new();
        view.set_entries(vec![saved(42)]);

        match view.handle_key(key(KeyCode::Char('d'))) {
            Some(AppEvent::RemoveSaved(42)) => {}
            other => panic!("expected RemoveSaved(42), got {other:?}"),
        }
    }

    #[test]
    fn test_selection_clamped_after_removal() {
        let mut view = SavedView::new();
        view.set_entries(vec![saved(1), saved(2), saved(3)]);
        view.handle_key(key(KeyCode::Char('G')));
        assert_eq!(view.selected, 2);

        view.set_entries(vec![saved(1), saved(2)]);
        assert_eq!(view.selected, 1);
    }

    #[test]
    fn test_empty_view_emits_nothing() {
        let mut view = SavedView::new();
        assert!(view.handle_key(key(KeyCode::Enter)).is_none());
        assert!(view.handle_key(key(KeyCode::Char('d'))).is_none());
    }
}
