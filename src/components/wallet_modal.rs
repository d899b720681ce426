use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::address::Address;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Overlay listing the wallet daemon's accounts. Connecting picks the
/// session address; the app stays usable read-only when the daemon is
/// down.
pub struct WalletModal {
    pub visible: bool,
    pub loading: bool,
    pub accounts: Vec<Address>,
    pub connected: Option<Address>,
    pub error: Option<String>,
    pub selected: usize,
    table_state: TableState,
}

impl WalletModal {
    pub fn new() -> Self {
        Self {
            visible: false,
            loading: false,
            accounts: Vec::new(),
            connected: None,
            error: None,
            selected: 0,
            table_state: TableState::default().with_selected(0),
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.loading = true;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn set_accounts(&mut self, accounts: Vec<Address>) {
        self.loading = false;
        self.error = None;
        if self.selected >= accounts.len() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
        self.accounts = accounts;
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.accounts.clear();
        self.error = Some(message);
    }

    fn select_next(&mut self) {
        if self.accounts.is_empty() {
            return;
        }
        let next = if self.selected + 1 >= self.accounts.len() {
            self.selected
        } else {
            self.selected + 1
        };
        self.selected = next;
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.accounts.is_empty() {
            return;
        }
        let prev = self.selected.saturating_sub(1);
        self.selected = prev;
        self.table_state.select(Some(prev));
    }

    /// Consumes every key while visible.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('w') | KeyCode::Char('q') => {
                self.close();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') => {
                if !self.accounts.is_empty() {
                    self.selected = 0;
                    self.table_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if !self.accounts.is_empty() {
                    let last = self.accounts.len() - 1;
                    self.selected = last;
                    self.table_state.select(Some(last));
                }
                None
            }
            KeyCode::Char('d') => {
                if self.connected.is_some() {
                    self.close();
                    return Some(AppEvent::DisconnectRequested);
                }
                None
            }
            KeyCode::Enter => {
                if let Some(addr) = self.accounts.get(self.selected).copied() {
                    self.close();
                    return Some(AppEvent::ConnectRequested(addr));
                }
                None
            }
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width.min(72);
        let popup_height = (self.accounts.len() as u16 + 7).min(area.height * 70 / 100).max(9);
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Wallet Accounts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        if self.loading {
            let text = Paragraph::new("Contacting wallet daemon...")
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, chunks[0]);
        } else if let Some(ref err) = self.error {
            let text = Paragraph::new(format!("Wallet daemon unavailable:\n{err}"))
                .style(THEME.error_style())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(text, chunks[0]);
        } else if self.accounts.is_empty() {
            let text = Paragraph::new("The wallet daemon reported no accounts.")
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, chunks[0]);
        } else {
            let rows: Vec<Row> = self
                .accounts
                .iter()
                .enumerate()
                .map(|(i, addr)| {
                    let marker = if Some(*addr) == self.connected {
                        Span::styled("\u{25cf}", THEME.success_style())
                    } else {
                        Span::raw(" ")
                    };
                    Row::new(vec![
                        Cell::from(format!("{}", i + 1)),
                        Cell::from(Line::from(marker)),
                        Cell::from(utils::truncate_address(addr)).style(THEME.address_style()),
                        Cell::from(format!("{addr}")).style(THEME.muted_style()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(16),
                Constraint::Min(20),
            ];

            let table = Table::new(rows, widths)
                .row_highlight_style(THEME.selected_style())
                .highlight_symbol(" > ");

            frame.render_stateful_widget(table, chunks[0], &mut self.table_state);
        }

        let hint = if self.connected.is_some() {
            "  [Enter] Connect  [d] Disconnect  [Esc] Close"
        } else {
            "  [Enter] Connect  [Esc] Close"
        };
        let footer = Paragraph::new(hint).style(THEME.muted_style());
        frame.render_widget(footer, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_connects_selected() {
        let mut modal = WalletModal::new();
        modal.open();
        modal.set_accounts(vec![Address([1u8; 32]), Address([2u8; 32])]);

        modal.handle_key(key(KeyCode::Char('j')));
        let event = modal.handle_key(key(KeyCode::Enter));

        match event {
            Some(AppEvent::ConnectRequested(addr)) => assert_eq!(addr, Address([2u8; 32])),
            other => panic!("expected ConnectRequested, got {other:?}"),
        }
        assert!(!modal.visible);
    }

    #[test]
    fn test_enter_with_no_accounts_is_noop() {
        let mut modal = WalletModal::new();
        modal.open();
        modal.set_accounts(Vec::new());

        assert!(modal.handle_key(key(KeyCode::Enter)).is_none());
        assert!(modal.visible);
    }

    #[test]
    fn test_disconnect_requires_connection() {
        let mut modal = WalletModal::new();
        modal.open();
        modal.set_accounts(vec![Address([1u8; 32])]);

        assert!(modal.handle_key(key(KeyCode::Char('d'))).is_none());

        modal.open();
        modal.connected = Some(Address([1u8; 32]));
        match modal.handle_key(key(KeyCode::Char('d'))) {
            Some(AppEvent::DisconnectRequested) => {}
            other => panic!("expected DisconnectRequested, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut modal = WalletModal::new();
        modal.set_accounts(vec![Address([1u8; 32]), Address([2u8; 32])]);

        modal.handle_key(key(KeyCode::Char('k')));
        assert_eq!(modal.selected, 0);
        modal.handle_key(key(KeyCode::Char('j')));
        modal.handle_key(key(KeyCode::Char('j')));
        modal.handle_key(key(KeyCode::Char('j')));
        assert_eq!(modal.selected, 1);
    }

    #[test]
    fn test_stale_selection_resets_on_new_accounts() {
        let mut modal = WalletModal::new();
        modal.set_accounts(vec![
            Address([1u8; 32]),
            Address([2u8; 32]),
            Address([3u8; 32]),
        ]);
        modal.handle_key(key(KeyCode::Char('G')));
        assert_eq!(modal.selected, 2);

        modal.set_accounts(vec![Address([9u8; 32])]);
        assert_eq!(modal.selected, 0);
    }
}
