pub mod address;
pub mod algod;
pub mod bookmarks;
pub mod cache;
pub mod export;
pub mod globals;
pub mod market;
pub mod networks;
pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use color_eyre::eyre::Result;
use tokio::sync::RwLock;
use tokio::sync::mpsc;

use crate::data::address::Address;
use crate::data::algod::AlgodClient;
use crate::data::cache::DataCache;
use crate::data::market::MarketClient;
use crate::data::types::Listing;
use crate::events::AppEvent;
use crate::wallet::{Session, WalletClient};

pub struct DataService {
    algod: Arc<AlgodClient>,
    wallet: Arc<WalletClient>,
    cache: Arc<RwLock<DataCache>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    listing_generation: AtomicU64,
}

impl DataService {
    pub fn new(
        algod: AlgodClient,
        wallet: WalletClient,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            algod: Arc::new(algod),
            wallet: Arc::new(wallet),
            cache: Arc::new(RwLock::new(DataCache::new())),
            event_tx,
            listing_generation: AtomicU64::new(0),
        }
    }

    pub fn wallet(&self) -> Arc<WalletClient> {
        Arc::clone(&self.wallet)
    }

    /// Build the contract client for `app_id` as the given sender. Always
    /// a fresh derivation so it can never carry a stale app id or a
    /// signer from a previous wallet connection.
    pub fn market_client(&self, app_id: u64, sender: Option<Session>) -> MarketClient {
        MarketClient::new(Arc::clone(&self.algod), app_id, sender)
    }

    /// Fetch the node's genesis id and latest round and send them as a
    /// connection event.
    pub fn connect_info(&self) {
        let algod = Arc::clone(&self.algod);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match tokio::join!(algod.genesis_id(), algod.last_round()) {
                (Ok(genesis_id), Ok(last_round)) => {
                    let _ = tx.send(AppEvent::Connected {
                        genesis_id,
                        last_round,
                    });
                }
                (Err(e), _) | (_, Err(e)) => {
                    let _ = tx.send(AppEvent::NodeUnreachable(format!("{e}")));
                }
            }
        });
    }

    /// Poll node status on an interval and publish the latest round.
    /// On failure, backs off up to 30s and keeps trying.
    pub fn watch_rounds(&self, every: Duration) {
        let algod = Arc::clone(&self.algod);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let max_backoff = Duration::from_secs(30);
            let mut delay = every;

            loop {
                tokio::time::sleep(delay).await;
                match algod.last_round().await {
                    Ok(round) => {
                        delay = every;
                        let _ = tx.send(AppEvent::RoundAdvanced(round));
                    }
                    Err(e) => {
                        let _ = tx.send(AppEvent::NodeUnreachable(format!("{e}")));
                        delay = (delay * 2).min(max_backoff);
                    }
                }
            }
        });
    }

    /// Fetch the complete listing record for `app_id` and send it as a
    /// single event. Returns the generation tag of this request; the app
    /// drops any result whose tag is older than the latest it issued, so
    /// a slow response for a previous app id can never overwrite current
    /// state.
    pub fn fetch_listing(&self, app_id: u64) -> u64 {
        let generation = self.listing_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let algod = Arc::clone(&self.algod);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match load_listing(&algod, app_id).await {
                Ok(listing) => {
                    let _ = tx.send(AppEvent::ListingLoaded {
                        generation,
                        listing,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::ListingUnavailable {
                        generation,
                        app_id,
                        reason: format!("{e}"),
                    });
                }
            }
        });

        generation
    }

    /// Fetch asset parameters, serving from cache when fresh.
    pub fn fetch_asset_params(&self, asset_id: u64) {
        let algod = Arc::clone(&self.algod);
        let cache = Arc::clone(&self.cache);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            {
                let mut c = cache.write().await;
                if let Some(cached) = c.get_asset(asset_id) {
                    let _ = tx.send(AppEvent::AssetParamsLoaded(cached));
                    return;
                }
            }

            match algod.asset_params(asset_id).await {
                Ok(params) => {
                    {
                        let mut c = cache.write().await;
                        c.put_asset(params.clone());
                    }
                    let _ = tx.send(AppEvent::AssetParamsLoaded(params));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(format!(
                        "Failed to fetch asset {asset_id}: {e}"
                    )));
                }
            }
        });
    }

    /// Fetch an account's balance, serving from cache when fresh.
    pub fn fetch_account(&self, address: Address) {
        self.spawn_account_fetch(address, false);
    }

    /// Re-read an account from the node, bypassing the cache. Used after
    /// actions that move funds.
    pub fn refresh_account(&self, address: Address) {
        self.spawn_account_fetch(address, true);
    }

    fn spawn_account_fetch(&self, address: Address, skip_cache: bool) {
        let algod = Arc::clone(&self.algod);
        let cache = Arc::clone(&self.cache);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            {
                let mut c = cache.write().await;
                if skip_cache {
                    c.invalidate_account(&address);
                } else if let Some(cached) = c.get_account(&address) {
                    let _ = tx.send(AppEvent::AccountLoaded(cached));
                    return;
                }
            }

            match algod.account(&address).await {
                Ok(info) => {
                    {
                        let mut c = cache.write().await;
                        c.put_account(info);
                    }
                    let _ = tx.send(AppEvent::AccountLoaded(info));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(format!("Failed to fetch account: {e}")));
                }
            }
        });
    }

    /// Ask the wallet daemon for the addresses it can sign for.
    pub fn fetch_wallet_accounts(&self) {
        let wallet = Arc::clone(&self.wallet);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match wallet.accounts().await {
                Ok(accounts) => {
                    let _ = tx.send(AppEvent::WalletAccounts(accounts));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::WalletUnavailable(format!("{e}")));
                }
            }
        });
    }
}

// --- Fetch helpers ---

/// Assemble a complete listing record: decoded globals, then the creator,
/// then the escrow's asset holding. Fails as a whole, so the UI either
/// gets a full record or resets the whole listing, never partial state.
async fn load_listing(algod: &Arc<AlgodClient>, app_id: u64) -> Result<Listing> {
    let market = MarketClient::new(Arc::clone(algod), app_id, None);

    let globals = market.global_state().await?;
    let seller = market.creator().await?;

    // A listing whose asset is not set yet cannot have escrowed units.
    // A missing holding (never opted in, or opted out) also counts as 0.
    let units_left = if globals.asset_id == 0 {
        0
    } else {
        algod
            .account_asset_holding(&market.app_address(), globals.asset_id)
            .await?
            .unwrap_or(0)
    };

    Ok(Listing {
        app_id,
        asset_id: globals.asset_id,
        unitary_price: globals.unitary_price,
        units_left,
        seller,
    })
}
