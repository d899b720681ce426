use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::export;
use crate::data::types::{ActivityEntry, ActivityStatus};
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Session-scoped log of marketplace actions, newest first.
pub struct ActivityView {
    pub entries: Vec<ActivityEntry>,
    pub selected: usize,
    table_state: TableState,
    scroll_state: ScrollbarState,
}

impl ActivityView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
            table_state: TableState::default().with_selected(0),
            scroll_state: ScrollbarState::default(),
        }
    }

    pub fn push(&mut self, entry: ActivityEntry) {
        self.entries.insert(0, entry);
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

impl Component for ActivityView {
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
            KeyCode::Char('e') => {
                if self.entries.is_empty() {
                    return None;
                }
                let path = format!("activity-{}.csv", Utc::now().format("%Y%m%d-%H%M%S"));
                match export::export_activity_csv(&self.entries, &path) {
                    Ok(msg) => Some(AppEvent::ExportComplete(msg)),
                    Err(e) => Some(AppEvent::Error(e)),
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer_block = Block::default()
            .title(" Activity ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());

        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        if self.entries.is_empty() {
            let text = Paragraph::new(
                "No activity yet.\n\nCompleted and failed marketplace actions show up here.",
            )
            .style(THEME.muted_style())
            .alignment(Alignment::Center);
            frame.render_widget(text, inner);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Time"),
            Cell::from("Action"),
            Cell::from("App ID"),
            Cell::from("Tx ID"),
            Cell::from("Status"),
            Cell::from("Note"),
        ])
        .style(THEME.table_header_style())
        .bottom_margin(0);

        let rows: Vec<Row> = self
            .entries
            .iter()
            .map(|entry| {
                let status_style = match entry.status {
                    ActivityStatus::Confirmed => THEME.success_style(),
                    ActivityStatus::Failed => THEME.error_style(),
                };
                let tx_id = entry
                    .tx_id
                    .as_deref()
                    .map(utils::truncate_txid)
                    .unwrap_or_else(|| "-".to_string());
                Row::new(vec![
                    Cell::from(utils::format_time_ago(entry.timestamp)).style(THEME.muted_style()),
                    Cell::from(entry.kind.to_string()).style(THEME.accent_style()),
                    Cell::from(format!("{}", entry.app_id)),
                    Cell::from(tx_id).style(THEME.txid_style()),
                    Cell::from(entry.status.to_string()).style(status_style),
                    Cell::from(entry.note.clone()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Min(16),
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
    use crate::data::types::ActionKind;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry(app_id: u64) -> ActivityEntry {
        ActivityEntry {
            timestamp: 1_700_000_000,
            kind: ActionKind::Buy,
            app_id,
            tx_id: Some("TX".to_string()),
            note: "bought".to_string(),
            status: ActivityStatus::Confirmed,
        }
    }

    #[test]
    fn test_push_prepends_newest() {
        let mut view = ActivityView::new();
        view.push(entry(1));
        view.push(entry(2));
        assert_eq!(view.entries[0].app_id, 2);
        assert_eq!(view.entries[1].app_id, 1);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut view = ActivityView::new();
        view.handle_key(key(KeyCode::Char('j')));
        assert_eq!(view.selected, 0);

        view.push(entry(1));
        view.push(entry(2));
        view.handle_key(key(KeyCode::Char('j')));
        view.handle_key(key(KeyCode::Char('j')));
        assert_eq!(view.selected, 1);
        view.handle_key(key(KeyCode::Char('k')));
        assert_eq!(view.selected, 0);
    }

    #[test]
    fn test_export_with_no_entries_is_noop() {
        let mut view = ActivityView::new();
        assert!(view.handle_key(key(KeyCode::Char('e'))).is_none());
    }
}
