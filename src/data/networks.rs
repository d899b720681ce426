use crate::data::types::NetworkConfig;

/// Default API token of an AlgoKit LocalNet algod container.
const LOCALNET_TOKEN: &str =
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Get a network configuration preset by name.
pub fn get_network_config(name: &str) -> Option<NetworkConfig> {
    match name.to_lowercase().as_str() {
        "localnet" | "local" | "sandbox" => Some(NetworkConfig {
            name: "LocalNet".to_string(),
            algod_url: "http://localhost:4001".to_string(),
            algod_token: Some(LOCALNET_TOKEN.to_string()),
        }),
        "testnet" => Some(NetworkConfig {
            name: "TestNet".to_string(),
            algod_url: "https://testnet-api.algonode.cloud".to_string(),
            algod_token: None,
        }),
        "mainnet" => Some(NetworkConfig {
            name: "MainNet".to_string(),
            algod_url: "https://mainnet-api.algonode.cloud".to_string(),
            algod_token: None,
        }),
        _ => None,
    }
}

/// Return a list of all supported network names.
pub fn supported_networks() -> Vec<&'static str> {
    vec!["localnet", "testnet", "mainnet"]
}
