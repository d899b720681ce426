use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::actions::{self, ActionRunner};
use crate::components::Component;
use crate::components::activity::ActivityView;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::market::MarketView;
use crate::components::saved::SavedView;
use crate::components::status_bar::StatusBar;
use crate::components::wallet_modal::WalletModal;
use crate::data::DataService;
use crate::data::address::Address;
use crate::data::bookmarks::Bookmarks;
use crate::data::types::{ActionKind, ActivityEntry, ActivityStatus, Listing};
use crate::events::{ActionOutcome, AppEvent, View};
use crate::theme::THEME;
use crate::utils;
use crate::wallet::Session;

pub struct App {
    // Navigation
    current_view: View,

    // Components
    header: Header,
    market: MarketView,
    activity: ActivityView,
    saved: SavedView,
    status_bar: StatusBar,
    wallet_modal: WalletModal,
    help: HelpOverlay,

    // Services
    data_service: Arc<DataService>,
    actions: ActionRunner,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    bookmarks: Bookmarks,
    session: Option<Session>,
    app_id: u64,
    listing: Option<Listing>,
    /// Generation tag of the listing fetch whose result we still want.
    /// None while no fetch is outstanding; stale arrivals never match.
    listing_request: Option<u64>,
    busy: Option<ActionKind>,
    should_quit: bool,
    tick_rate: Duration,
    round_poll: Duration,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn with_services(
        data_service: Arc<DataService>,
        actions: ActionRunner,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        network: String,
        initial_app_id: u64,
        tick_rate_ms: u64,
        round_poll_ms: u64,
    ) -> Self {
        let bookmarks = Bookmarks::load();
        let mut saved = SavedView::new();
        saved.set_entries(bookmarks.list().to_vec());

        Self {
            current_view: View::Market,
            header: Header::new(network),
            market: MarketView::new(),
            activity: ActivityView::new(),
            saved,
            status_bar: StatusBar::new(),
            wallet_modal: WalletModal::new(),
            help: HelpOverlay::new(),
            data_service,
            actions,
            event_rx,
            bookmarks,
            session: None,
            app_id: initial_app_id,
            listing: None,
            listing_request: None,
            busy: None,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
            round_poll: Duration::from_millis(round_poll_ms),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        self.data_service.connect_info();
        self.data_service.watch_rounds(self.round_poll);
        if self.app_id != 0 {
            self.commit_app_id(self.app_id);
        }

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Fill background
        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | content (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);

        match self.current_view {
            View::Market => self.market.render(frame, chunks[1]),
            View::Activity => self.activity.render(frame, chunks[1]),
            View::Saved => self.saved.render(frame, chunks[1]),
        }

        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.wallet_modal.render(frame, area);
        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Help overlay consumes all keys when visible
            if self.help.handle_key(key) {
                return;
            }

            // Wallet modal consumes keys when visible
            if self.wallet_modal.visible {
                if let Some(event) = self.wallet_modal.handle_key(key) {
                    self.handle_app_event(event);
                }
                return;
            }

            // A field edit in the market form consumes keys, digits included
            if self.current_view == View::Market && self.market.editing {
                if let Some(event) = self.market.handle_key(key) {
                    self.handle_app_event(event);
                }
                return;
            }

            // Global keys
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.help.toggle();
                    return;
                }
                KeyCode::Char('w') => {
                    self.wallet_modal.open();
                    self.data_service.fetch_wallet_accounts();
                    return;
                }
                // Tab switching with number keys
                KeyCode::Char('1') => {
                    self.navigate_to(View::Market);
                    return;
                }
                KeyCode::Char('2') => {
                    self.navigate_to(View::Activity);
                    return;
                }
                KeyCode::Char('3') => {
                    self.navigate_to(View::Saved);
                    return;
                }
                KeyCode::Esc => {
                    self.go_back();
                    return;
                }
                _ => {}
            }

            // Delegate to current view's component
            let app_event = match self.current_view {
                View::Market => self.market.handle_key(key),
                View::Activity => self.activity.handle_key(key),
                View::Saved => self.saved.handle_key(key),
            };

            if let Some(event) = app_event {
                self.handle_app_event(event);
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connected {
                genesis_id,
                last_round,
            } => {
                self.header.genesis_id = genesis_id;
                self.header.last_round = last_round;
                self.header.connected = true;
                self.status_bar.last_round = last_round;
                self.status_bar.connected = true;
            }
            AppEvent::RoundAdvanced(round) => {
                self.header.last_round = round;
                self.header.connected = true;
                self.status_bar.last_round = round;
                self.status_bar.connected = true;
            }
            AppEvent::NodeUnreachable(message) => {
                self.header.connected = false;
                self.status_bar.connected = false;
                self.status_bar.error_message = Some(message);
            }
            AppEvent::ListingLoaded {
                generation,
                listing,
            } => {
                // A newer request owns the view; drop the stale result
                if self.listing_request != Some(generation) {
                    return;
                }
                self.listing_request = None;
                self.status_bar.loading = false;
                self.app_id = listing.app_id;
                self.listing = Some(listing.clone());
                if listing.asset_id != 0 {
                    self.data_service.fetch_asset_params(listing.asset_id);
                }
                self.market.set_listing(listing);
            }
            AppEvent::ListingUnavailable {
                generation,
                app_id,
                reason,
            } => {
                if self.listing_request != Some(generation) {
                    return;
                }
                self.listing_request = None;
                self.status_bar.loading = false;
                self.listing = None;
                self.market.load_failed();
                self.status_bar.error_message = Some(format!("Listing #{app_id}: {reason}"));
            }
            AppEvent::AssetParamsLoaded(params) => {
                self.market.set_asset(params);
            }
            AppEvent::AccountLoaded(info) => {
                if self.session.as_ref().map(|s| s.address) == Some(info.address) {
                    self.status_bar.balance = Some(info.spendable());
                }
            }
            AppEvent::WalletAccounts(accounts) => {
                self.wallet_modal.set_accounts(accounts);
            }
            AppEvent::WalletUnavailable(message) => {
                if self.wallet_modal.visible {
                    self.wallet_modal.set_error(message);
                } else {
                    self.status_bar.error_message = Some(message);
                }
            }
            AppEvent::ConnectRequested(address) => {
                let session = Session::new(self.data_service.wallet(), address);
                self.session = Some(session);
                self.market.set_session(Some(address));
                self.wallet_modal.connected = Some(address);
                self.status_bar.session_address = Some(address);
                self.status_bar.balance = None;
                self.status_bar.status_message =
                    Some(format!("Connected {}", utils::truncate_address(&address)));
                self.data_service.fetch_account(address);
            }
            AppEvent::DisconnectRequested => {
                self.session = None;
                self.market.set_session(None);
                self.wallet_modal.connected = None;
                self.status_bar.session_address = None;
                self.status_bar.balance = None;
                self.status_bar.status_message = Some("Wallet disconnected".to_string());
            }
            AppEvent::ActionStarted(kind) => {
                self.busy = Some(kind);
                self.market.busy = Some(kind);
                self.status_bar.busy = Some(kind);
                self.status_bar.error_message = None;
                self.status_bar.status_message = None;
            }
            AppEvent::ActionCompleted { kind, outcome } => {
                self.busy = None;
                self.market.busy = None;
                self.status_bar.busy = None;
                self.finish_action(kind, outcome);
            }
            AppEvent::ActionFailed { kind, message } => {
                self.busy = None;
                self.market.busy = None;
                self.status_bar.busy = None;
                self.activity.push(ActivityEntry {
                    timestamp: Utc::now().timestamp() as u64,
                    kind,
                    app_id: self.app_id,
                    tx_id: None,
                    note: message.clone(),
                    status: ActivityStatus::Failed,
                });
                self.status_bar.error_message = Some(format!("{kind} failed: {message}"));
            }
            AppEvent::CommitAppId(app_id) => {
                self.commit_app_id(app_id);
            }
            AppEvent::RefreshListing => {
                self.refresh_listing();
            }
            AppEvent::SubmitCreate {
                asset_id,
                unitary_price,
                quantity,
            } => {
                let Some(session) = self.session.clone() else {
                    return;
                };
                self.actions.run(
                    ActionKind::Create,
                    actions::create(session.signer, asset_id, unitary_price, quantity),
                );
            }
            AppEvent::SubmitBuy { quantity } => {
                let (Some(session), Some(listing)) = (self.session.clone(), self.listing.clone())
                else {
                    return;
                };
                self.actions.run(
                    ActionKind::Buy,
                    actions::buy(
                        session.signer,
                        listing.app_id,
                        Address::for_application(listing.app_id),
                        quantity,
                        listing.unitary_price,
                    ),
                );
            }
            AppEvent::SubmitWithdraw => {
                let Some(session) = self.session.clone() else {
                    return;
                };
                let market = self.data_service.market_client(self.app_id, Some(session));
                self.actions.run(ActionKind::Withdraw, actions::withdraw(market));
            }
            AppEvent::SaveListing => {
                self.save_current_listing();
            }
            AppEvent::RemoveSaved(app_id) => {
                if self.bookmarks.remove(app_id) {
                    if let Err(e) = self.bookmarks.save() {
                        self.status_bar.error_message = Some(e);
                    }
                    self.saved.set_entries(self.bookmarks.list().to_vec());
                    self.status_bar.status_message = Some(format!("Removed listing #{app_id}"));
                }
            }
            AppEvent::OpenListing(app_id) => {
                self.navigate_to(View::Market);
                self.commit_app_id(app_id);
            }
            AppEvent::ExportComplete(message) => {
                self.status_bar.status_message = Some(message);
            }
            AppEvent::Navigate(view) => {
                self.navigate_to(view);
            }
            AppEvent::Back => {
                self.go_back();
            }
            AppEvent::Error(message) => {
                self.status_bar.error_message = Some(message);
                self.status_bar.loading = false;
            }
        }
    }

    /// Adopt a new current App ID: wipe the old record atomically, then
    /// fetch the new listing (0 means "no listing", nothing to fetch).
    /// Any in-flight fetch for a previous id is orphaned here.
    fn commit_app_id(&mut self, app_id: u64) {
        self.app_id = app_id;
        self.listing = None;
        self.market.begin_load(app_id);
        self.status_bar.loading = app_id != 0;
        self.listing_request = if app_id == 0 {
            None
        } else {
            Some(self.data_service.fetch_listing(app_id))
        };
    }

    /// Re-read the current listing without wiping what is on screen; the
    /// record is replaced whole when the result lands.
    fn refresh_listing(&mut self) {
        if self.app_id == 0 {
            return;
        }
        self.status_bar.loading = true;
        self.listing_request = Some(self.data_service.fetch_listing(self.app_id));
    }

    fn finish_action(&mut self, kind: ActionKind, outcome: ActionOutcome) {
        let now = Utc::now().timestamp() as u64;
        match outcome {
            ActionOutcome::Created { app_id, tx_id } => {
                self.activity.push(ActivityEntry {
                    timestamp: now,
                    kind,
                    app_id,
                    tx_id: Some(tx_id),
                    note: "Listing created".to_string(),
                    status: ActivityStatus::Confirmed,
                });
                self.status_bar.status_message = Some(format!("Created listing #{app_id}"));
                self.commit_app_id(app_id);
            }
            ActionOutcome::Purchased { quantity, tx_id } => {
                self.activity.push(ActivityEntry {
                    timestamp: now,
                    kind,
                    app_id: self.app_id,
                    tx_id: Some(tx_id),
                    note: format!("Bought {quantity} units"),
                    status: ActivityStatus::Confirmed,
                });
                self.status_bar.status_message = Some(format!("Bought {quantity} units"));
                self.refresh_listing();
            }
            ActionOutcome::Withdrawn { tx_id } => {
                self.activity.push(ActivityEntry {
                    timestamp: now,
                    kind,
                    app_id: self.app_id,
                    tx_id: Some(tx_id),
                    note: "Proceeds withdrawn, listing retired".to_string(),
                    status: ActivityStatus::Confirmed,
                });
                self.status_bar.status_message = Some("Proceeds withdrawn".to_string());
                self.commit_app_id(0);
            }
        }
        // Whatever the action, the balance moved
        if let Some(address) = self.session.as_ref().map(|s| s.address) {
            self.data_service.refresh_account(address);
        }
    }

    fn save_current_listing(&mut self) {
        let Some(ref listing) = self.listing else {
            return;
        };
        let label = self
            .market
            .asset
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| format!("App {}", listing.app_id));

        if self.bookmarks.add(listing.app_id, label) {
            if let Err(e) = self.bookmarks.save() {
                self.status_bar.error_message = Some(e);
            } else {
                self.status_bar.status_message =
                    Some(format!("Saved listing #{}", listing.app_id));
            }
            self.saved.set_entries(self.bookmarks.list().to_vec());
        } else {
            self.status_bar.status_message = Some("Already saved".to_string());
        }
    }

    fn navigate_to(&mut self, view: View) {
        self.header.current_tab = match view {
            View::Market => 0,
            View::Activity => 1,
            View::Saved => 2,
        };
        self.status_bar.error_message = None;
        self.current_view = view;

        if view == View::Saved {
            self.saved.set_entries(self.bookmarks.list().to_vec());
        }
    }

    fn go_back(&mut self) {
        if self.current_view != View::Market {
            self.navigate_to(View::Market);
        }
    }
}
