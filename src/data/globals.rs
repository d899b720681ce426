use data_encoding::BASE64;
use serde::Deserialize;

use crate::data::types::MicroAlgos;

/// Global-state keys the marketplace application maintains.
const KEY_UNITARY_PRICE: &[u8] = b"unitaryPrice";
const KEY_ASSET_ID: &[u8] = b"assetId";

/// TEAL value kind for uints, as algod reports it. Bytes values are 1.
const TEAL_TYPE_UINT: u64 = 2;

/// One key/value pair of an application's global state, as algod returns
/// it. Keys are base64-encoded bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct TealKeyValue {
    pub key: String,
    pub value: TealValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TealValue {
    #[serde(rename = "type")]
    pub value_type: u64,
    #[serde(default)]
    pub bytes: String,
    #[serde(default)]
    pub uint: u64,
}

/// Decoded marketplace globals. Keys the contract has not written yet
/// decode as zero, which downstream reads as "no listing".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketGlobals {
    pub unitary_price: MicroAlgos,
    pub asset_id: u64,
}

impl MarketGlobals {
    pub fn from_key_values(entries: &[TealKeyValue]) -> MarketGlobals {
        let mut globals = MarketGlobals::default();
        for entry in entries {
            let Ok(key) = BASE64.decode(entry.key.as_bytes()) else {
                continue;
            };
            if entry.value.value_type != TEAL_TYPE_UINT {
                continue;
            }
            if key == KEY_UNITARY_PRICE {
                globals.unitary_price = MicroAlgos(entry.value.uint);
            } else if key == KEY_ASSET_ID {
                globals.asset_id = entry.value.uint;
            }
        }
        globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint_entry(key: &str, value: u64) -> TealKeyValue {
        TealKeyValue {
            key: BASE64.encode(key.as_bytes()),
            value: TealValue {
                value_type: TEAL_TYPE_UINT,
                bytes: String::new(),
                uint: value,
            },
        }
    }

    fn bytes_entry(key: &str, value: &str) -> TealKeyValue {
        TealKeyValue {
            key: BASE64.encode(key.as_bytes()),
            value: TealValue {
                value_type: 1,
                bytes: BASE64.encode(value.as_bytes()),
                uint: 0,
            },
        }
    }

    #[test]
    fn test_decodes_both_keys() {
        let entries = vec![
            uint_entry("unitaryPrice", 1_000_000),
            uint_entry("assetId", 7),
        ];
        let globals = MarketGlobals::from_key_values(&entries);
        assert_eq!(globals.unitary_price, MicroAlgos(1_000_000));
        assert_eq!(globals.asset_id, 7);
    }

    #[test]
    fn test_missing_keys_decode_as_zero() {
        let entries = vec![uint_entry("unitaryPrice", 5_000_000)];
        let globals = MarketGlobals::from_key_values(&entries);
        assert_eq!(globals.unitary_price, MicroAlgos(5_000_000));
        assert_eq!(globals.asset_id, 0);
    }

    #[test]
    fn test_empty_state_is_default() {
        let globals = MarketGlobals::from_key_values(&[]);
        assert_eq!(globals, MarketGlobals::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let entries = vec![
            uint_entry("somethingElse", 99),
            uint_entry("assetId", 12),
        ];
        let globals = MarketGlobals::from_key_values(&entries);
        assert_eq!(globals.unitary_price, MicroAlgos(0));
        assert_eq!(globals.asset_id, 12);
    }

    #[test]
    fn test_bytes_typed_value_ignored() {
        // A bytes value under a uint key must not be read as a number
        let entries = vec![bytes_entry("unitaryPrice", "not a number")];
        let globals = MarketGlobals::from_key_values(&entries);
        assert_eq!(globals.unitary_price, MicroAlgos(0));
    }

    #[test]
    fn test_invalid_base64_key_skipped() {
        let entries = vec![
            TealKeyValue {
                key: "!!!not base64!!!".to_string(),
                value: TealValue {
                    value_type: TEAL_TYPE_UINT,
                    bytes: String::new(),
                    uint: 3,
                },
            },
            uint_entry("assetId", 7),
        ];
        let globals = MarketGlobals::from_key_values(&entries);
        assert_eq!(globals.asset_id, 7);
    }
}
