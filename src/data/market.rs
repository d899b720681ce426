use std::sync::Arc;

use color_eyre::eyre::Result;

use crate::data::address::Address;
use crate::data::algod::AlgodClient;
use crate::data::globals::MarketGlobals;
use crate::wallet::Session;

/// Typed proxy for one deployed marketplace application.
///
/// Deliberately cheap to construct: derived from `(app_id, sender)` plus
/// the shared algod handle at each use, so it can never hold a stale app
/// id or a signer from a previous wallet connection.
pub struct MarketClient {
    algod: Arc<AlgodClient>,
    app_id: u64,
    sender: Option<Session>,
}

impl MarketClient {
    pub fn new(algod: Arc<AlgodClient>, app_id: u64, sender: Option<Session>) -> MarketClient {
        MarketClient {
            algod,
            app_id,
            sender,
        }
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn sender(&self) -> Option<&Session> {
        self.sender.as_ref()
    }

    /// The account address owned by this application instance. Holds the
    /// escrowed units and the sale proceeds.
    pub fn app_address(&self) -> Address {
        Address::for_application(self.app_id)
    }

    /// Read and decode `unitaryPrice` and `assetId` from the app's
    /// global state.
    pub async fn global_state(&self) -> Result<MarketGlobals> {
        let info = self.algod.application(self.app_id).await?;
        Ok(MarketGlobals::from_key_values(&info.global_state))
    }

    /// Creator of the application instance; the listing's seller.
    pub async fn creator(&self) -> Result<Address> {
        Ok(self.algod.application(self.app_id).await?.creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_address_matches_derivation() {
        let algod = Arc::new(AlgodClient::new("http://localhost:4001", None).unwrap());
        let client = MarketClient::new(algod, 1002, None);
        assert_eq!(client.app_address(), Address::for_application(1002));
        assert_eq!(client.app_id(), 1002);
        assert!(client.sender().is_none());
    }
}
