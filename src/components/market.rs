use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::address::Address;
use crate::data::export;
use crate::data::types::{ActionKind, AssetParams, Listing, MicroAlgos};
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Form fields, cycled with Tab. Which ones are visible depends on the
/// listing state: the create fields only exist while no App ID is set,
/// the buy quantity only while the listing has units left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AppId,
    AssetId,
    Price,
    Quantity,
}

pub struct MarketView {
    pub listing: Option<Listing>,
    pub asset: Option<AssetParams>,
    pub committed_app_id: u64,
    pub session_address: Option<Address>,
    pub loading: bool,
    pub busy: Option<ActionKind>,
    pub editing: bool,
    focus: Field,
    edit_backup: String,
    app_id_input: String,
    asset_id_input: String,
    price_input: String,
    quantity_input: String,
}

impl MarketView {
    pub fn new() -> Self {
        Self {
            listing: None,
            asset: None,
            committed_app_id: 0,
            session_address: None,
            loading: false,
            busy: None,
            editing: false,
            focus: Field::AppId,
            edit_backup: String::new(),
            app_id_input: String::new(),
            asset_id_input: String::new(),
            price_input: String::new(),
            quantity_input: String::new(),
        }
    }

    // --- Enablement rules ---

    pub fn can_create(&self) -> bool {
        self.session_address.is_some() && self.committed_app_id == 0
    }

    pub fn can_buy(&self) -> bool {
        self.session_address.is_some()
            && self.committed_app_id != 0
            && self.listing.as_ref().is_some_and(|l| l.units_left > 0)
    }

    pub fn can_withdraw(&self) -> bool {
        if self.committed_app_id == 0 {
            return false;
        }
        match (&self.session_address, &self.listing) {
            (Some(addr), Some(listing)) => listing.sold_out() && *addr == listing.seller,
            _ => false,
        }
    }

    // --- State applied by the app loop ---

    /// A new App ID was committed: remember it, wipe the old record and
    /// mark the load in flight. Committing 0 means "no listing".
    pub fn begin_load(&mut self, app_id: u64) {
        self.committed_app_id = app_id;
        self.app_id_input = if app_id == 0 {
            String::new()
        } else {
            app_id.to_string()
        };
        self.loading = app_id != 0;
        self.clear_record();
        self.reset_hidden_focus();
    }

    /// The whole record arrives together; the price and asset fields
    /// mirror chain state (unit price shown in whole ALGO).
    pub fn set_listing(&mut self, listing: Listing) {
        self.loading = false;
        self.committed_app_id = listing.app_id;
        self.app_id_input = listing.app_id.to_string();
        self.asset_id_input = listing.asset_id.to_string();
        self.price_input = listing.unitary_price.whole_algos().to_string();
        self.listing = Some(listing);
        self.reset_hidden_focus();
    }

    /// The whole record resets together; price and asset never outlive
    /// a failed lookup.
    pub fn load_failed(&mut self) {
        self.loading = false;
        self.clear_record();
        self.reset_hidden_focus();
    }

    pub fn set_asset(&mut self, params: AssetParams) {
        // Keep only params for the asset the current listing sells
        if self.listing.as_ref().is_some_and(|l| l.asset_id == params.id) {
            self.asset = Some(params);
        }
    }

    pub fn set_session(&mut self, address: Option<Address>) {
        self.session_address = address;
        self.reset_hidden_focus();
    }

    fn clear_record(&mut self) {
        self.listing = None;
        self.asset = None;
        self.asset_id_input.clear();
        self.price_input.clear();
    }

    // --- Form state ---

    fn quantity(&self) -> u64 {
        self.quantity_input.parse().unwrap_or(0)
    }

    fn input(&self, field: Field) -> &String {
        match field {
            Field::AppId => &self.app_id_input,
            Field::AssetId => &self.asset_id_input,
            Field::Price => &self.price_input,
            Field::Quantity => &self.quantity_input,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::AppId => &mut self.app_id_input,
            Field::AssetId => &mut self.asset_id_input,
            Field::Price => &mut self.price_input,
            Field::Quantity => &mut self.quantity_input,
        }
    }

    fn visible_fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::AppId];
        if self.can_create() {
            fields.extend([Field::AssetId, Field::Price, Field::Quantity]);
        } else if self.listing.as_ref().is_some_and(|l| !l.sold_out()) {
            fields.push(Field::Quantity);
        }
        fields
    }

    fn focus_next(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    fn focus_prev(&mut self) {
        let fields = self.visible_fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    fn reset_hidden_focus(&mut self) {
        if !self.visible_fields().contains(&self.focus) {
            self.focus = Field::AppId;
            self.editing = false;
        }
    }

    // --- Submissions ---

    fn submit_create(&self) -> Option<AppEvent> {
        if self.busy.is_some() || !self.can_create() {
            return None;
        }
        let asset_id = self.asset_id_input.parse().unwrap_or(0);
        let algos: u64 = self.price_input.parse().unwrap_or(0);
        Some(AppEvent::SubmitCreate {
            asset_id,
            unitary_price: MicroAlgos::from_algos(algos),
            quantity: self.quantity(),
        })
    }

    fn submit_buy(&self) -> Option<AppEvent> {
        if self.busy.is_some() || !self.can_buy() {
            return None;
        }
        let quantity = self.quantity();
        let units_left = self.listing.as_ref().map(|l| l.units_left).unwrap_or(0);
        if quantity == 0 {
            return Some(AppEvent::Error("Enter a quantity before buying".to_string()));
        }
        if quantity > units_left {
            return Some(AppEvent::Error(format!("Only {units_left} units left")));
        }
        Some(AppEvent::SubmitBuy { quantity })
    }

    fn submit_withdraw(&self) -> Option<AppEvent> {
        if self.busy.is_some() || !self.can_withdraw() {
            return None;
        }
        Some(AppEvent::SubmitWithdraw)
    }

    fn cost_line(&self) -> String {
        let quantity = self.quantity();
        let price = self
            .listing
            .as_ref()
            .map(|l| l.unitary_price)
            .unwrap_or_default();
        let unit = self.asset.as_ref().map(|a| a.ticker()).unwrap_or("units");
        format!(
            "Buy {quantity} {unit} for {} ALGO",
            price.total_for(quantity).whole_algos()
        )
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc => {
                let backup = self.edit_backup.clone();
                *self.input_mut(self.focus) = backup;
                self.editing = false;
                None
            }
            KeyCode::Enter => {
                self.editing = false;
                if self.focus == Field::AppId {
                    // Unparseable or empty input counts as "no listing"
                    let id = self.app_id_input.parse().unwrap_or(0);
                    return Some(AppEvent::CommitAppId(id));
                }
                None
            }
            KeyCode::Tab => {
                self.focus_next();
                self.edit_backup = self.input(self.focus).clone();
                None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                self.edit_backup = self.input(self.focus).clone();
                None
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let input = self.input_mut(self.focus);
                if input.len() < 20 {
                    input.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                self.input_mut(self.focus).pop();
                None
            }
            _ => None,
        }
    }

    fn field_line(&self, label: &str, field: Field, suffix: &str) -> Line<'static> {
        let text = self.input(field);
        let focused = self.focus == field;
        let cursor = if focused && self.editing { "_" } else { "" };
        let shown = if text.is_empty() && !(focused && self.editing) {
            "0"
        } else {
            text.as_str()
        };

        let label_style = if focused {
            THEME.accent_style()
        } else {
            THEME.muted_style()
        };
        let value_style = if focused {
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.text)
        };

        Line::from(vec![
            Span::styled(format!("  {label}"), label_style),
            Span::styled(format!("{shown}{cursor}"), value_style),
            Span::styled(suffix.to_string(), THEME.muted_style()),
        ])
    }
}

impl Component for MarketView {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                None
            }
            KeyCode::Enter => {
                self.editing = true;
                self.edit_backup = self.input(self.focus).clone();
                None
            }
            KeyCode::Char('c') => self.submit_create(),
            KeyCode::Char('b') => self.submit_buy(),
            KeyCode::Char('d') => self.submit_withdraw(),
            KeyCode::Char('r') => {
                if self.committed_app_id != 0 {
                    Some(AppEvent::RefreshListing)
                } else {
                    None
                }
            }
            KeyCode::Char('s') => {
                if self.listing.is_some() {
                    Some(AppEvent::SaveListing)
                } else {
                    None
                }
            }
            KeyCode::Char('e') => {
                let listing = self.listing.as_ref()?;
                let path = format!("listing-{}.json", listing.app_id);
                match export::export_listing_json(listing, &path) {
                    Ok(msg) => Some(AppEvent::ExportComplete(msg)),
                    Err(e) => Some(AppEvent::Error(e)),
                }
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer_block = Block::default()
            .title(" Market ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());

        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(8),
                Constraint::Min(6),
            ])
            .split(inner);

        // -- App ID line --
        let mut app_id_line = self.field_line("App ID:      ", Field::AppId, "");
        app_id_line.push_span(Span::styled(
            "   [Enter] Load  [r] Refresh",
            THEME.muted_style(),
        ));
        frame.render_widget(Paragraph::new(app_id_line), chunks[0]);

        // -- Listing panel --
        let listing_block = Block::default()
            .title(" Listing ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let listing_inner = listing_block.inner(chunks[1]);
        frame.render_widget(listing_block, chunks[1]);

        if self.loading {
            let text = Paragraph::new(format!("Loading listing #{}...", self.committed_app_id))
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, listing_inner);
        } else if let Some(ref listing) = self.listing {
            let asset_desc = match self.asset {
                Some(ref params) => {
                    let name = params.name.as_deref().unwrap_or("unnamed");
                    format!("{}  {name} ({})", listing.asset_id, params.ticker())
                }
                None => format!("{}", listing.asset_id),
            };
            let seller_suffix = if self.session_address == Some(listing.seller) {
                "  (you)"
            } else {
                ""
            };

            let mut lines = vec![
                Line::from(vec![
                    Span::styled("  Asset:       ", THEME.muted_style()),
                    Span::styled(asset_desc, THEME.accent_style()),
                ]),
                Line::from(vec![
                    Span::styled("  Unit Price:  ", THEME.muted_style()),
                    Span::styled(utils::format_algos(listing.unitary_price), THEME.algo_style()),
                ]),
                Line::from(vec![
                    Span::styled("  Units Left:  ", THEME.muted_style()),
                    if listing.sold_out() {
                        Span::styled("0  SOLD OUT", THEME.warning_style().add_modifier(Modifier::BOLD))
                    } else {
                        Span::styled(utils::format_number(listing.units_left), Style::default().fg(THEME.text))
                    },
                ]),
                Line::from(vec![
                    Span::styled("  Seller:      ", THEME.muted_style()),
                    Span::styled(utils::truncate_address(&listing.seller), THEME.address_style()),
                    Span::styled(seller_suffix, THEME.success_style()),
                ]),
                Line::from(vec![
                    Span::styled("  Escrow:      ", THEME.muted_style()),
                    Span::styled(
                        utils::truncate_address(&Address::for_application(listing.app_id)),
                        THEME.address_style(),
                    ),
                ]),
            ];
            lines.push(Line::from(Span::styled(
                "  [s] Save  [e] Export JSON",
                THEME.muted_style(),
            )));
            frame.render_widget(Paragraph::new(lines), listing_inner);
        } else {
            let msg = if self.committed_app_id == 0 {
                "No App ID set. Enter one above, or create a new listing below."
            } else {
                "Listing could not be loaded."
            };
            let text = Paragraph::new(msg)
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, listing_inner);
        }

        // -- Action section --
        if self.can_create() {
            let create_block = Block::default()
                .title(" Create Listing ")
                .borders(Borders::ALL)
                .border_style(THEME.border_style());
            let create_inner = create_block.inner(chunks[2]);
            frame.render_widget(create_block, chunks[2]);

            let lines = vec![
                self.field_line("Asset ID:    ", Field::AssetId, ""),
                self.field_line("Unit Price:  ", Field::Price, " ALGO"),
                self.field_line("Quantity:    ", Field::Quantity, ""),
                Line::from(""),
                Line::from(Span::styled(
                    if self.busy.is_some() {
                        "  Submitting..."
                    } else {
                        "  [c] Create App"
                    },
                    THEME.accent_style(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines), create_inner);
        } else if let Some(ref listing) = self.listing {
            if listing.sold_out() {
                let block = Block::default()
                    .title(" Withdraw ")
                    .borders(Borders::ALL)
                    .border_style(THEME.border_style());
                let block_inner = block.inner(chunks[2]);
                frame.render_widget(block, chunks[2]);

                let hint = if self.busy.is_some() {
                    Line::from(Span::styled("  Submitting...", THEME.accent_style()))
                } else if self.can_withdraw() {
                    Line::from(Span::styled(
                        "  [d] Withdraw proceeds and retire the listing",
                        THEME.accent_style(),
                    ))
                } else if self.session_address.is_none() {
                    Line::from(Span::styled(
                        "  Connect the seller wallet [w] to withdraw.",
                        THEME.muted_style(),
                    ))
                } else {
                    Line::from(Span::styled(
                        "  Only the seller can withdraw.",
                        THEME.muted_style(),
                    ))
                };

                let lines = vec![
                    Line::from(Span::styled(
                        "  All units sold.",
                        THEME.warning_style(),
                    )),
                    Line::from(""),
                    hint,
                ];
                frame.render_widget(Paragraph::new(lines), block_inner);
            } else {
                let block = Block::default()
                    .title(" Buy ")
                    .borders(Borders::ALL)
                    .border_style(THEME.border_style());
                let block_inner = block.inner(chunks[2]);
                frame.render_widget(block, chunks[2]);

                let hint = if self.busy.is_some() {
                    Line::from(Span::styled("  Submitting...", THEME.accent_style()))
                } else if self.can_buy() {
                    Line::from(Span::styled("  [b] Buy", THEME.accent_style()))
                } else {
                    Line::from(Span::styled(
                        "  Connect a wallet [w] to buy.",
                        THEME.muted_style(),
                    ))
                };

                let lines = vec![
                    self.field_line("Quantity:    ", Field::Quantity, ""),
                    Line::from(vec![
                        Span::styled("  ", THEME.muted_style()),
                        Span::styled(self.cost_line(), THEME.algo_style()),
                    ]),
                    Line::from(""),
                    hint,
                ];
                frame.render_widget(Paragraph::new(lines), block_inner);
            }
        } else if self.session_address.is_none() && self.committed_app_id == 0 {
            let text = Paragraph::new("Connect a wallet [w] to create a listing.")
                .style(THEME.muted_style())
                .alignment(Alignment::Center);
            frame.render_widget(text, chunks[2]);
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

    fn listing(units_left: u64) -> Listing {
        Listing {
            app_id: 42,
            asset_id: 7,
            unitary_price: MicroAlgos(1_000_000),
            units_left,
            seller: Address([1u8; 32]),
        }
    }

    fn type_digits(view: &mut MarketView, digits: &str) {
        view.handle_key(key(KeyCode::Enter));
        for c in digits.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_create_enabled_only_without_app_id() {
        let mut view = MarketView::new();
        assert!(!view.can_create());

        view.set_session(Some(Address([2u8; 32])));
        assert!(view.can_create());

        view.begin_load(42);
        assert!(!view.can_create());

        view.begin_load(0);
        assert!(view.can_create());
    }

    #[test]
    fn test_buy_enabled_with_session_listing_and_units() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        assert!(!view.can_buy());

        view.set_session(Some(Address([2u8; 32])));
        assert!(view.can_buy());

        view.set_listing(listing(0));
        assert!(!view.can_buy());

        view.load_failed();
        assert!(!view.can_buy());
    }

    #[test]
    fn test_withdraw_enabled_only_for_seller_when_sold_out() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(0));
        assert!(!view.can_withdraw());

        view.set_session(Some(Address([2u8; 32])));
        assert!(!view.can_withdraw());

        view.set_session(Some(Address([1u8; 32])));
        assert!(view.can_withdraw());

        view.set_listing(listing(3));
        assert!(!view.can_withdraw());
    }

    #[test]
    fn test_example_scenario_buy_enabled_with_zero_quantity() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        view.set_session(Some(Address([2u8; 32])));

        assert!(view.can_buy());
        assert_eq!(view.cost_line(), "Buy 0 units for 0 ALGO");
    }

    #[test]
    fn test_cost_line_truncates_to_whole_algos() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(Listing {
            unitary_price: MicroAlgos(2_000_000),
            ..listing(10)
        });
        view.set_session(Some(Address([2u8; 32])));

        view.focus = Field::Quantity;
        type_digits(&mut view, "3");
        view.handle_key(key(KeyCode::Enter));

        assert_eq!(view.cost_line(), "Buy 3 units for 6 ALGO");
    }

    #[test]
    fn test_price_field_mirrors_listing_in_whole_algos() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(Listing {
            unitary_price: MicroAlgos(5_000_000),
            ..listing(10)
        });
        assert_eq!(view.price_input, "5");
    }

    #[test]
    fn test_failed_load_clears_whole_record() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        assert!(view.listing.is_some());
        assert_eq!(view.price_input, "1");

        view.load_failed();
        assert!(view.listing.is_none());
        assert!(view.asset.is_none());
        assert!(view.price_input.is_empty());
        assert!(view.asset_id_input.is_empty());
        assert_eq!(view.committed_app_id, 42);
    }

    #[test]
    fn test_commit_app_id_from_input() {
        let mut view = MarketView::new();
        type_digits(&mut view, "42");
        let event = view.handle_key(key(KeyCode::Enter));
        match event {
            Some(AppEvent::CommitAppId(42)) => {}
            other => panic!("expected CommitAppId(42), got {other:?}"),
        }
    }

    #[test]
    fn test_commit_empty_app_id_is_zero() {
        let mut view = MarketView::new();
        view.app_id_input = "42".to_string();
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Backspace));
        view.handle_key(key(KeyCode::Backspace));
        let event = view.handle_key(key(KeyCode::Enter));
        match event {
            Some(AppEvent::CommitAppId(0)) => {}
            other => panic!("expected CommitAppId(0), got {other:?}"),
        }
    }

    #[test]
    fn test_edit_escape_restores_previous_value() {
        let mut view = MarketView::new();
        view.app_id_input = "42".to_string();
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Char('9')));
        assert_eq!(view.app_id_input, "429");
        view.handle_key(key(KeyCode::Esc));
        assert_eq!(view.app_id_input, "42");
        assert!(!view.editing);
    }

    #[test]
    fn test_non_digits_ignored_while_editing() {
        let mut view = MarketView::new();
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Char('x')));
        view.handle_key(key(KeyCode::Char('4')));
        assert_eq!(view.app_id_input, "4");
    }

    #[test]
    fn test_create_submits_price_in_microalgos() {
        let mut view = MarketView::new();
        view.set_session(Some(Address([2u8; 32])));

        view.focus = Field::AssetId;
        type_digits(&mut view, "7");
        view.handle_key(key(KeyCode::Tab));
        for c in "2".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        view.handle_key(key(KeyCode::Tab));
        for c in "100".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        view.handle_key(key(KeyCode::Enter));

        let event = view.handle_key(key(KeyCode::Char('c')));
        match event {
            Some(AppEvent::SubmitCreate {
                asset_id,
                unitary_price,
                quantity,
            }) => {
                assert_eq!(asset_id, 7);
                assert_eq!(unitary_price, MicroAlgos(2_000_000));
                assert_eq!(quantity, 100);
            }
            other => panic!("expected SubmitCreate, got {other:?}"),
        }
    }

    #[test]
    fn test_create_ignored_when_disabled() {
        let mut view = MarketView::new();
        assert!(view.handle_key(key(KeyCode::Char('c'))).is_none());

        view.set_session(Some(Address([2u8; 32])));
        view.begin_load(42);
        assert!(view.handle_key(key(KeyCode::Char('c'))).is_none());
    }

    #[test]
    fn test_buy_zero_quantity_rejected_locally() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        view.set_session(Some(Address([2u8; 32])));

        match view.handle_key(key(KeyCode::Char('b'))) {
            Some(AppEvent::Error(msg)) => assert!(msg.contains("quantity")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_buy_over_units_left_rejected_locally() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(3));
        view.set_session(Some(Address([2u8; 32])));

        view.focus = Field::Quantity;
        type_digits(&mut view, "5");
        view.handle_key(key(KeyCode::Enter));

        match view.handle_key(key(KeyCode::Char('b'))) {
            Some(AppEvent::Error(msg)) => assert_eq!(msg, "Only 3 units left"),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_buy_submits_quantity() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        view.set_session(Some(Address([2u8; 32])));

        view.focus = Field::Quantity;
        type_digits(&mut view, "3");
        view.handle_key(key(KeyCode::Enter));

        match view.handle_key(key(KeyCode::Char('b'))) {
            Some(AppEvent::SubmitBuy { quantity: 3 }) => {}
            other => panic!("expected SubmitBuy, got {other:?}"),
        }
    }

    #[test]
    fn test_withdraw_submits_only_when_enabled() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(0));
        view.set_session(Some(Address([1u8; 32])));

        match view.handle_key(key(KeyCode::Char('d'))) {
            Some(AppEvent::SubmitWithdraw) => {}
            other => panic!("expected SubmitWithdraw, got {other:?}"),
        }

        view.set_session(Some(Address([2u8; 32])));
        assert!(view.handle_key(key(KeyCode::Char('d'))).is_none());
    }

    #[test]
    fn test_actions_ignored_while_busy() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));
        view.set_session(Some(Address([2u8; 32])));
        view.focus = Field::Quantity;
        type_digits(&mut view, "3");
        view.handle_key(key(KeyCode::Enter));

        view.busy = Some(ActionKind::Buy);
        assert!(view.handle_key(key(KeyCode::Char('b'))).is_none());

        view.busy = None;
        assert!(view.handle_key(key(KeyCode::Char('b'))).is_some());
    }

    #[test]
    fn test_refresh_requires_committed_app_id() {
        let mut view = MarketView::new();
        assert!(view.handle_key(key(KeyCode::Char('r'))).is_none());

        view.begin_load(42);
        match view.handle_key(key(KeyCode::Char('r'))) {
            Some(AppEvent::RefreshListing) => {}
            other => panic!("expected RefreshListing, got {other:?}"),
        }
    }

    #[test]
    fn test_focus_skips_hidden_fields() {
        let mut view = MarketView::new();
        // No session, no listing: App ID is the only field
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus, Field::AppId);

        // Create mode exposes the full form
        view.set_session(Some(Address([2u8; 32])));
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus, Field::AssetId);
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus, Field::Price);

        // Loading a listing collapses back to App ID
        view.begin_load(42);
        assert_eq!(view.focus, Field::AppId);
    }

    #[test]
    fn test_asset_params_for_other_asset_ignored() {
        let mut view = MarketView::new();
        view.begin_load(42);
        view.set_listing(listing(10));

        view.set_asset(AssetParams {
            id: 99,
            name: Some("Other".to_string()),
            unit_name: None,
            decimals: 0,
            total: 1,
        });
        assert!(view.asset.is_none());

        view.set_asset(AssetParams {
            id: 7,
            name: Some("Token".to_string()),
            unit_name: Some("TOK".to_string()),
            decimals: 0,
            total: 1000,
        });
        assert!(view.asset.is_some());
        assert_eq!(view.cost_line(), "Buy 0 TOK for 0 ALGO");
    }
}
