use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::data::address::Address;
use crate::data::types::MicroAlgos;

/// Header the wallet daemon expects its API token in.
const TOKEN_HEADER: &str = "X-Wallet-API-Token";

/// Client for the wallet daemon that custodies keys and executes the
/// marketplace method calls. The TUI never sees private key material; it
/// only names a sender address the daemon controls, and the daemon builds,
/// groups, signs and submits the transactions.
pub struct WalletClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl WalletClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<WalletClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(WalletClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Addresses the daemon can sign for.
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        let resp: AccountsResponse = self.get("/v1/accounts").await?;
        let mut accounts = Vec::with_capacity(resp.accounts.len());
        for addr in resp.accounts {
            let parsed = addr
                .parse::<Address>()
                .map_err(|e| eyre!("Bad address from wallet daemon: {e}"))?;
            accounts.push(parsed);
        }
        Ok(accounts)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("Wallet daemon request failed: {path}"))?;
        decode_response(response, path).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("Wallet daemon request failed: {path}"))?;
        decode_response(response, path).await
    }
}

async fn decode_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    path: &str,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| status.to_string());
        return Err(eyre!("Wallet daemon: {message}"));
    }
    response
        .json::<T>()
        .await
        .wrap_err_with(|| format!("Wallet daemon returned unexpected JSON for {path}"))
}

/// A capability to execute marketplace calls as one address. Holds no key
/// material, only the daemon handle and the address the daemon signs as.
#[derive(Clone)]
pub struct Signer {
    wallet: Arc<WalletClient>,
    address: Address,
}

impl Signer {
    pub fn new(wallet: Arc<WalletClient>, address: Address) -> Signer {
        Signer { wallet, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Deploy a listing app selling `quantity` units of `asset_id` at
    /// `unitary_price` each. The daemon deploys, opts the app into the
    /// asset and moves the units into escrow in one flow.
    pub async fn create_listing(
        &self,
        asset_id: u64,
        unitary_price: MicroAlgos,
        quantity: u64,
    ) -> Result<CreateReceipt> {
        self.wallet
            .post(
                "/v1/market/create",
                &CreateRequest {
                    sender: self.address.to_string(),
                    asset_id,
                    unitary_price: unitary_price.0,
                    quantity,
                },
            )
            .await
    }

    /// Buy `quantity` units: the daemon groups the payment to the app
    /// address with the buy call and signs both.
    pub async fn buy(
        &self,
        app_id: u64,
        app_address: &Address,
        quantity: u64,
        unitary_price: MicroAlgos,
    ) -> Result<TxReceipt> {
        self.wallet
            .post(
                "/v1/market/buy",
                &BuyRequest {
                    sender: self.address.to_string(),
                    app_id,
                    app_address: app_address.to_string(),
                    quantity,
                    unitary_price: unitary_price.0,
                },
            )
            .await
    }

    /// Delete the listing app, sweeping proceeds and any leftover units
    /// back to the sender. Only the app creator can do this.
    pub async fn withdraw(&self, app_id: u64) -> Result<TxReceipt> {
        self.wallet
            .post(
                "/v1/market/withdraw",
                &WithdrawRequest {
                    sender: self.address.to_string(),
                    app_id,
                },
            )
            .await
    }
}

/// An active wallet connection: the address acting in the UI plus the
/// signer bound to it.
#[derive(Clone)]
pub struct Session {
    pub address: Address,
    pub signer: Signer,
}

impl Session {
    pub fn new(wallet: Arc<WalletClient>, address: Address) -> Session {
        Session {
            address,
            signer: Signer::new(wallet, address),
        }
    }
}

// --- Wire models ---

#[derive(Deserialize)]
struct AccountsResponse {
    accounts: Vec<String>,
}

#[derive(Serialize)]
struct CreateRequest {
    sender: String,
    asset_id: u64,
    unitary_price: u64,
    quantity: u64,
}

#[derive(Serialize)]
struct BuyRequest {
    sender: String,
    app_id: u64,
    app_address: String,
    quantity: u64,
    unitary_price: u64,
}

#[derive(Serialize)]
struct WithdrawRequest {
    sender: String,
    app_id: u64,
}

/// Receipt of a create call: the deployed app plus the confirming txid.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceipt {
    pub app_id: u64,
    pub tx_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxReceipt {
    pub tx_id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_shape() {
        let request = CreateRequest {
            sender: Address([0x05; 32]).to_string(),
            asset_id: 7,
            unitary_price: 2_000_000,
            quantity: 10,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["asset_id"], 7);
        assert_eq!(value["unitary_price"], 2_000_000);
        assert_eq!(value["quantity"], 10);
        assert_eq!(value["sender"].as_str().unwrap().len(), 58);
    }

    #[test]
    fn test_buy_request_carries_app_address() {
        let app_address = Address::for_application(1002);
        let request = BuyRequest {
            sender: Address([0x05; 32]).to_string(),
            app_id: 1002,
            app_address: app_address.to_string(),
            quantity: 3,
            unitary_price: 1_000_000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["app_address"], app_address.to_string());
    }

    #[test]
    fn test_create_receipt_parses() {
        let json = r#"{"app_id": 1002, "tx_id": "TXID123"}"#;
        let receipt: CreateReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.app_id, 1002);
        assert_eq!(receipt.tx_id, "TXID123");
    }

    #[test]
    fn test_accounts_response_parses() {
        let json = r#"{"accounts": ["A", "B"]}"#;
        let resp: AccountsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.accounts.len(), 2);
    }

    #[test]
    fn test_signer_address() {
        let wallet = Arc::new(WalletClient::new("http://localhost:7979", None).unwrap());
        let address = Address([0x09; 32]);
        let session = Session::new(wallet, address);
        assert_eq!(session.signer.address(), address);
        assert_eq!(session.address, address);
    }
}
