use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 70 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let help_text = vec![
            Line::from(Span::styled(
                "Navigation",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("  Tab      ", Style::default().fg(THEME.text_accent)),
                Span::styled("Next form field", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  Enter    ", Style::default().fg(THEME.text_accent)),
                Span::styled("Edit field / commit value", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  Esc      ", Style::default().fg(THEME.text_accent)),
                Span::styled("Cancel edit / close overlay", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled(
                    "  \u{2191}\u{2193}/jk    ",
                    Style::default().fg(THEME.text_accent),
                ),
                Span::styled("Move in tables", Style::default().fg(THEME.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Views",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("  1        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Market", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  2        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Activity", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  3        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Saved listings", Style::default().fg(THEME.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Marketplace",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("  Enter    ", Style::default().fg(THEME.text_accent)),
                Span::styled("Commit App ID (loads the listing)", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  c        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Create listing (no App ID set)", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  b        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Buy units", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  d        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Withdraw (seller, sold out)", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  r        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Refresh listing from chain", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  s        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Save listing bookmark", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  e        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Export (listing JSON / activity CSV)", Style::default().fg(THEME.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Wallet",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("  w        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Open wallet accounts", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  Enter    ", Style::default().fg(THEME.text_accent)),
                Span::styled("Connect selected account", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  d        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Disconnect", Style::default().fg(THEME.text)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Other",
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("  ?        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Toggle this help", Style::default().fg(THEME.text)),
            ]),
            Line::from(vec![
                Span::styled("  q        ", Style::default().fg(THEME.text_accent)),
                Span::styled("Quit", Style::default().fg(THEME.text)),
            ]),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
