use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub network_name: String,
    pub genesis_id: String,
    pub last_round: u64,
    pub current_tab: usize,
    pub connected: bool,
}

const TABS: &[&str] = &["Market [1]", "Activity [2]", "Saved [3]"];

impl Header {
    pub fn new(network_name: String) -> Self {
        Self {
            network_name,
            genesis_id: String::new(),
            last_round: 0,
            current_tab: 0,
            connected: false,
        }
    }

    fn display_network(&self) -> &str {
        if !self.genesis_id.is_empty() {
            return &self.genesis_id;
        }
        &self.network_name
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // Split the header into three sections: left (title), center (tabs), right (network info)
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(0),
                Constraint::Length(30),
            ])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Span::styled(
            " asamart",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        // Center: Tab navigation
        let tab_titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
        let tabs = Tabs::new(tab_titles)
            .select(self.current_tab)
            .style(THEME.muted_style())
            .highlight_style(THEME.accent_style().add_modifier(Modifier::BOLD))
            .divider(Span::raw(" | "));
        frame.render_widget(tabs, chunks[1]);

        // Right: Network name and latest round
        let round_str = utils::format_number(self.last_round);
        let network_info = Line::from(vec![
            Span::styled(self.display_network(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("#{round_str}"), THEME.accent_style()),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
