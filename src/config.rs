use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "asamart", about = "Terminal client for the digital marketplace contract")]
pub struct Config {
    /// Network preset (localnet, testnet, mainnet)
    #[arg(short, long, default_value = "localnet")]
    pub network: String,

    /// algod endpoint URL, overriding the network preset
    #[arg(long)]
    pub algod_url: Option<String>,

    /// algod API token, overriding the network preset
    #[arg(long, env = "ALGOD_TOKEN")]
    pub algod_token: Option<String>,

    /// Wallet daemon endpoint URL
    #[arg(long, default_value = "http://localhost:7979")]
    pub wallet_url: String,

    /// Wallet daemon API token
    #[arg(long, env = "WALLET_TOKEN")]
    pub wallet_token: Option<String>,

    /// Application ID of a listing to load at startup
    #[arg(short, long, default_value = "0")]
    pub app_id: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Interval in milliseconds between round polls
    #[arg(long, default_value = "2000")]
    pub round_poll_ms: u64,
}
