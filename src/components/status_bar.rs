use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::address::Address;
use crate::data::types::{ActionKind, MicroAlgos};
use crate::theme::THEME;
use crate::utils;

pub struct StatusBar {
    pub connected: bool,
    pub last_round: u64,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub loading: bool,
    pub busy: Option<ActionKind>,
    pub session_address: Option<Address>,
    pub balance: Option<MicroAlgos>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            connected: false,
            last_round: 0,
            error_message: None,
            status_message: None,
            loading: false,
            busy: None,
            session_address: None,
            balance: None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(56)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if let Some(kind) = self.busy {
            Line::from(Span::styled(
                format!(" Submitting {kind}..."),
                Style::default().fg(THEME.text_accent),
            ))
        } else if self.loading {
            Line::from(Span::styled(
                " Loading...",
                Style::default().fg(THEME.text_accent),
            ))
        } else if let Some(ref msg) = self.status_message {
            Line::from(vec![
                Span::styled(
                    " \u{2713} ",
                    Style::default()
                        .fg(THEME.success)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.as_str(), Style::default().fg(THEME.text)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" Tab", Style::default().fg(THEME.text_accent)),
                Span::styled(":Field  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Enter", Style::default().fg(THEME.text_accent)),
                Span::styled(":Edit  ", Style::default().fg(THEME.text_muted)),
                Span::styled("w", Style::default().fg(THEME.text_accent)),
                Span::styled(":Wallet  ", Style::default().fg(THEME.text_muted)),
                Span::styled("?", Style::default().fg(THEME.text_accent)),
                Span::styled(":Help  ", Style::default().fg(THEME.text_muted)),
                Span::styled("q", Style::default().fg(THEME.text_accent)),
                Span::styled(":Quit", Style::default().fg(THEME.text_muted)),
            ])
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: session + connection status + round ---
        let (dot_color, status_text) = if self.connected {
            (THEME.success, "Connected")
        } else {
            (THEME.error, "Disconnected")
        };

        let session_span = match self.session_address {
            Some(ref addr) => {
                let balance = self
                    .balance
                    .map(utils::format_algos)
                    .unwrap_or_else(|| "...".to_string());
                Span::styled(
                    format!("{} {balance}", utils::truncate_address(addr)),
                    THEME.address_style(),
                )
            }
            None => Span::styled("No wallet", THEME.muted_style()),
        };

        let round_str = utils::format_number(self.last_round);

        let right_content = Line::from(vec![
            session_span,
            Span::styled(" | ", THEME.muted_style()),
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("#{round_str} "), THEME.accent_style()),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
