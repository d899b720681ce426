use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

use crate::data::address::Address;
use crate::data::globals::TealKeyValue;
use crate::data::types::{AccountInfo, AssetParams, MicroAlgos};

/// Header algod expects the API token in.
const TOKEN_HEADER: &str = "X-Algod-API-Token";

/// Thin typed client for the algod REST API (v2). Read-only: this
/// application never builds or submits transactions itself.
pub struct AlgodClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// A deployed application: its creator plus raw global state.
#[derive(Debug, Clone)]
pub struct ApplicationInfo {
    pub app_id: u64,
    pub creator: Address,
    pub global_state: Vec<TealKeyValue>,
}

impl AlgodClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<AlgodClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(AlgodClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Genesis id of the network the node is on, e.g. "testnet-v1.0".
    pub async fn genesis_id(&self) -> Result<String> {
        let versions: VersionsResponse = self.get("/versions").await?;
        Ok(versions.genesis_id)
    }

    /// Latest round the node has seen.
    pub async fn last_round(&self) -> Result<u64> {
        let status: StatusResponse = self.get("/v2/status").await?;
        Ok(status.last_round)
    }

    /// Look up a deployed application by id.
    pub async fn application(&self, app_id: u64) -> Result<ApplicationInfo> {
        let path = format!("/v2/applications/{app_id}");
        let resp: ApplicationResponse = match self.get_optional(&path).await? {
            Some(resp) => resp,
            None => return Err(eyre!("Application {app_id} does not exist")),
        };
        let creator = resp
            .params
            .creator
            .parse::<Address>()
            .map_err(|e| eyre!("Bad creator address from algod: {e}"))?;
        Ok(ApplicationInfo {
            app_id: resp.id,
            creator,
            global_state: resp.params.global_state,
        })
    }

    /// Units of an asset an account holds, or None if it never opted in.
    pub async fn account_asset_holding(
        &self,
        account: &Address,
        asset_id: u64,
    ) -> Result<Option<u64>> {
        let path = format!("/v2/accounts/{account}/assets/{asset_id}");
        let resp: Option<AccountAssetResponse> = self.get_optional(&path).await?;
        Ok(resp.and_then(|r| r.asset_holding).map(|h| h.amount))
    }

    /// Balance and minimum-balance requirement of an account.
    pub async fn account(&self, account: &Address) -> Result<AccountInfo> {
        let path = format!("/v2/accounts/{account}");
        let resp: AccountResponse = match self.get_optional(&path).await? {
            Some(resp) => resp,
            None => return Err(eyre!("Account {account} not found")),
        };
        Ok(AccountInfo {
            address: *account,
            balance: MicroAlgos(resp.amount),
            min_balance: MicroAlgos(resp.min_balance),
        })
    }

    /// Parameters of an asset: name, unit name, decimals, total supply.
    pub async fn asset_params(&self, asset_id: u64) -> Result<AssetParams> {
        let path = format!("/v2/assets/{asset_id}");
        let resp: AssetResponse = match self.get_optional(&path).await? {
            Some(resp) => resp,
            None => return Err(eyre!("Asset {asset_id} not found")),
        };
        Ok(AssetParams {
            id: resp.index,
            name: resp.params.name,
            unit_name: resp.params.unit_name,
            decimals: resp.params.decimals,
            total: resp.params.total,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        match self.get_optional(path).await? {
            Some(value) => Ok(value),
            None => Err(eyre!("algod returned 404 for {path}")),
        }
    }

    /// GET a path, decoding 404 as None and other failures as errors with
    /// the node's message when it sends one.
    async fn get_optional<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("algod request failed: {path}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(eyre!("algod: {message}"));
        }

        let value = response
            .json::<T>()
            .await
            .wrap_err_with(|| format!("algod returned unexpected JSON for {path}"))?;
        Ok(Some(value))
    }
}

// --- Wire models (algod uses kebab-case keys) ---

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(rename = "last-round")]
    last_round: u64,
}

#[derive(Deserialize)]
struct VersionsResponse {
    genesis_id: String,
}

#[derive(Deserialize)]
struct ApplicationResponse {
    id: u64,
    params: ApplicationParamsModel,
}

#[derive(Deserialize)]
struct ApplicationParamsModel {
    creator: String,
    #[serde(rename = "global-state", default)]
    global_state: Vec<TealKeyValue>,
}

#[derive(Deserialize)]
struct AccountAssetResponse {
    #[serde(rename = "asset-holding")]
    asset_holding: Option<AssetHoldingModel>,
}

#[derive(Deserialize)]
struct AssetHoldingModel {
    amount: u64,
}

#[derive(Deserialize)]
struct AccountResponse {
    amount: u64,
    #[serde(rename = "min-balance", default)]
    min_balance: u64,
}

#[derive(Deserialize)]
struct AssetResponse {
    index: u64,
    params: AssetParamsModel,
}

#[derive(Deserialize)]
struct AssetParamsModel {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "unit-name", default)]
    unit_name: Option<String>,
    #[serde(default)]
    decimals: u8,
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}
