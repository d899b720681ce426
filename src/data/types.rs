use serde::{Deserialize, Serialize};

use crate::data::address::Address;

/// An amount in microalgos. 1 ALGO = 1_000_000 microalgos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MicroAlgos(pub u64);

impl MicroAlgos {
    pub const PER_ALGO: u64 = 1_000_000;

    pub fn from_algos(algos: u64) -> MicroAlgos {
        MicroAlgos(algos.saturating_mul(Self::PER_ALGO))
    }

    /// Whole-ALGO value, truncating. The unit-price field edits and
    /// displays whole ALGO, so 5_000_000 microalgos reads back as 5.
    pub fn whole_algos(&self) -> u64 {
        self.0 / Self::PER_ALGO
    }

    /// Total price of `quantity` units at this unit price.
    pub fn total_for(&self, quantity: u64) -> MicroAlgos {
        MicroAlgos(self.0.saturating_mul(quantity))
    }
}

/// One sale: a deployed marketplace application instance. Fetched from
/// the chain as a whole and replaced as a whole; never patched field by
/// field from action callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub app_id: u64,
    pub asset_id: u64,
    pub unitary_price: MicroAlgos,
    pub units_left: u64,
    pub seller: Address,
}

impl Listing {
    pub fn sold_out(&self) -> bool {
        self.units_left == 0
    }
}

/// Parameters of an Algorand Standard Asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetParams {
    pub id: u64,
    pub name: Option<String>,
    pub unit_name: Option<String>,
    pub decimals: u8,
    pub total: u64,
}

impl AssetParams {
    pub fn ticker(&self) -> &str {
        self.unit_name.as_deref().unwrap_or("units")
    }
}

/// Balance summary of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: Address,
    pub balance: MicroAlgos,
    pub min_balance: MicroAlgos,
}

impl AccountInfo {
    /// Balance above the minimum-balance requirement.
    pub fn spendable(&self) -> MicroAlgos {
        MicroAlgos(self.balance.0.saturating_sub(self.min_balance.0))
    }
}

/// The three marketplace method calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Buy,
    Withdraw,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Create => write!(f, "Create App"),
            ActionKind::Buy => write!(f, "Buy"),
            ActionKind::Withdraw => write!(f, "Withdraw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Confirmed,
    Failed,
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Confirmed => write!(f, "Confirmed"),
            ActivityStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One row of the session's action log.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: u64,
    pub kind: ActionKind,
    pub app_id: u64,
    pub tx_id: Option<String>,
    pub note: String,
    pub status: ActivityStatus,
}

/// A bookmarked listing, persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedListing {
    pub app_id: u64,
    pub label: String,
    pub added_at: u64,
}

/// A named algod endpoint preset.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: String,
    pub algod_url: String,
    pub algod_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_algos_truncates() {
        assert_eq!(MicroAlgos(5_000_000).whole_algos(), 5);
        assert_eq!(MicroAlgos(5_999_999).whole_algos(), 5);
        assert_eq!(MicroAlgos(999_999).whole_algos(), 0);
        assert_eq!(MicroAlgos(0).whole_algos(), 0);
    }

    #[test]
    fn test_from_algos() {
        assert_eq!(MicroAlgos::from_algos(5), MicroAlgos(5_000_000));
        assert_eq!(MicroAlgos::from_algos(0), MicroAlgos(0));
    }

    #[test]
    fn test_buy_cost_in_whole_algos() {
        // 3 units at 2 ALGO each cost 6 ALGO
        assert_eq!(MicroAlgos(2_000_000).total_for(3).whole_algos(), 6);
        assert_eq!(MicroAlgos(2_000_000).total_for(0).whole_algos(), 0);
        assert_eq!(MicroAlgos(1_500_000).total_for(3).whole_algos(), 4);
    }

    #[test]
    fn test_total_for_saturates() {
        let total = MicroAlgos(u64::MAX).total_for(2);
        assert_eq!(total, MicroAlgos(u64::MAX));
    }

    #[test]
    fn test_spendable_saturates() {
        let info = AccountInfo {
            address: Address([0u8; 32]),
            balance: MicroAlgos(100_000),
            min_balance: MicroAlgos(250_000),
        };
        assert_eq!(info.spendable(), MicroAlgos(0));
    }

    #[test]
    fn test_sold_out() {
        let mut listing = Listing {
            app_id: 42,
            asset_id: 7,
            unitary_price: MicroAlgos(1_000_000),
            units_left: 10,
            seller: Address([1u8; 32]),
        };
        assert!(!listing.sold_out());
        listing.units_left = 0;
        assert!(listing.sold_out());
    }

    #[test]
    fn test_action_kind_display() {
        assert_eq!(ActionKind::Create.to_string(), "Create App");
        assert_eq!(ActionKind::Buy.to_string(), "Buy");
        assert_eq!(ActionKind::Withdraw.to_string(), "Withdraw");
    }

    #[test]
    fn test_activity_status_display() {
        assert_eq!(ActivityStatus::Confirmed.to_string(), "Confirmed");
        assert_eq!(ActivityStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_asset_ticker_fallback() {
        let params = AssetParams {
            id: 7,
            name: None,
            unit_name: None,
            decimals: 0,
            total: 1000,
        };
        assert_eq!(params.ticker(), "units");
    }
}
