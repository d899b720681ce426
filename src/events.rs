use crate::data::address::Address;
use crate::data::types::{AccountInfo, ActionKind, AssetParams, Listing, MicroAlgos};

/// Views the user can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Market,
    Activity,
    Saved,
}

/// What a completed marketplace action reports back. Only identifiers:
/// listing state is re-fetched from the chain, never patched locally.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Created { app_id: u64, tx_id: String },
    Purchased { quantity: u64, tx_id: String },
    Withdrawn { tx_id: String },
}

/// Events sent from background tasks and components to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Chain data
    Connected { genesis_id: String, last_round: u64 },
    RoundAdvanced(u64),
    NodeUnreachable(String),
    ListingLoaded { generation: u64, listing: Listing },
    ListingUnavailable { generation: u64, app_id: u64, reason: String },
    AssetParamsLoaded(AssetParams),
    AccountLoaded(AccountInfo),

    // Wallet daemon
    WalletAccounts(Vec<Address>),
    WalletUnavailable(String),
    ConnectRequested(Address),
    DisconnectRequested,

    // Marketplace actions
    ActionStarted(ActionKind),
    ActionCompleted { kind: ActionKind, outcome: ActionOutcome },
    ActionFailed { kind: ActionKind, message: String },

    // Market form intents
    CommitAppId(u64),
    RefreshListing,
    SubmitCreate { asset_id: u64, unitary_price: MicroAlgos, quantity: u64 },
    SubmitBuy { quantity: u64 },
    SubmitWithdraw,

    // Saved listings
    SaveListing,
    RemoveSaved(u64),
    OpenListing(u64),

    // Export
    ExportComplete(String),

    // Navigation
    Navigate(View),
    Back,

    // Status
    Error(String),
}
