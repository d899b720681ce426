use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::data::address::Address;
use crate::data::types::{AccountInfo, AssetParams};

/// TTL durations for cached data categories.
const ASSET_TTL: Duration = Duration::from_secs(3600); // asset params are effectively immutable
const ACCOUNT_TTL: Duration = Duration::from_secs(10); // balances change every round

/// Cache sizes for each data type.
const ASSET_CACHE_SIZE: usize = 64;
const ACCOUNT_CACHE_SIZE: usize = 16;

pub struct DataCache {
    assets: LruCache<u64, (Instant, AssetParams)>,
    accounts: LruCache<Address, (Instant, AccountInfo)>,
}

impl DataCache {
    pub fn new() -> Self {
        Self {
            assets: LruCache::new(NonZeroUsize::new(ASSET_CACHE_SIZE).unwrap()),
            accounts: LruCache::new(NonZeroUsize::new(ACCOUNT_CACHE_SIZE).unwrap()),
        }
    }

    // --- Asset params ---

    /// Get cached asset params, returning a clone. Returns None if expired or missing.
    pub fn get_asset(&mut self, asset_id: u64) -> Option<AssetParams> {
        let entry = self.assets.get(&asset_id)?;
        if entry.0.elapsed() < ASSET_TTL {
            Some(entry.1.clone())
        } else {
            self.assets.pop(&asset_id);
            None
        }
    }

    pub fn put_asset(&mut self, params: AssetParams) {
        self.assets.put(params.id, (Instant::now(), params));
    }

    // --- Account info ---

    /// Get cached account info. Returns None if expired or missing.
    pub fn get_account(&mut self, address: &Address) -> Option<AccountInfo> {
        let entry = self.accounts.get(address)?;
        if entry.0.elapsed() < ACCOUNT_TTL {
            Some(entry.1)
        } else {
            self.accounts.pop(address);
            None
        }
    }

    pub fn put_account(&mut self, info: AccountInfo) {
        self.accounts.put(info.address, (Instant::now(), info));
    }

    /// Drop a cached account so the next fetch goes to the node. Used
    /// after actions that move funds.
    pub fn invalidate_account(&mut self, address: &Address) {
        self.accounts.pop(address);
    }

    /// Evict all cached data. Useful when switching networks.
    pub fn clear(&mut self) {
        self.assets.clear();
        self.accounts.clear();
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}
