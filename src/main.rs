mod actions;
mod app;
mod components;
mod config;
mod data;
mod events;
mod theme;
mod utils;
mod wallet;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;

use crate::actions::ActionRunner;
use crate::app::App;
use crate::config::Config;
use crate::data::DataService;
use crate::data::algod::AlgodClient;
use crate::wallet::WalletClient;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    // Resolve the algod endpoint: network preset, then explicit overrides
    let preset = match data::networks::get_network_config(&config.network) {
        Some(preset) => preset,
        None => {
            eprintln!(
                "Unknown network '{}' (supported: {}), using localnet",
                config.network,
                data::networks::supported_networks().join(", ")
            );
            data::networks::get_network_config("localnet")
                .ok_or_else(|| color_eyre::eyre::eyre!("localnet preset missing"))?
        }
    };
    let network_name = preset.name;
    let algod_url = config.algod_url.unwrap_or(preset.algod_url);
    let algod_token = config.algod_token.or(preset.algod_token);

    eprintln!("Using algod at {algod_url} ({network_name})...");
    let algod = AlgodClient::new(&algod_url, algod_token)?;
    let wallet = WalletClient::new(&config.wallet_url, config.wallet_token)?;

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // Create data service and action runner
    let data_service = Arc::new(DataService::new(algod, wallet, event_tx.clone()));
    let actions = ActionRunner::new(event_tx);

    // Create app
    let mut app = App::with_services(
        data_service,
        actions,
        event_rx,
        network_name,
        config.app_id,
        config.tick_rate_ms,
        config.round_poll_ms,
    );

    // Initialize terminal
    let terminal = ratatui::init();
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
