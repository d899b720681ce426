use std::fs;
use std::io::Write;

use crate::data::address::Address;
use crate::data::types::{ActivityEntry, Listing};

/// Export the action log to CSV format.
///
/// Columns: timestamp, kind, app_id, tx_id, status, note
pub fn export_activity_csv(entries: &[ActivityEntry], path: &str) -> Result<String, String> {
    let file = fs::File::create(path).map_err(|e| format!("Failed to create file: {e}"))?;
    let mut wtr = csv::Writer::from_writer(file);

    // Write header
    wtr.write_record(["timestamp", "kind", "app_id", "tx_id", "status", "note"])
        .map_err(|e| format!("Failed to write CSV header: {e}"))?;

    // Write rows
    for entry in entries {
        wtr.write_record(&[
            entry.timestamp.to_string(),
            entry.kind.to_string(),
            entry.app_id.to_string(),
            entry.tx_id.clone().unwrap_or_default(),
            entry.status.to_string(),
            entry.note.clone(),
        ])
        .map_err(|e| format!("Failed to write CSV row: {e}"))?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {e}"))?;

    Ok(format!("Exported {} entries to {path}", entries.len()))
}

/// Export a listing snapshot to JSON format.
pub fn export_listing_json(listing: &Listing, path: &str) -> Result<String, String> {
    let json = serde_json::json!({
        "app_id": listing.app_id,
        "app_address": Address::for_application(listing.app_id).to_string(),
        "asset_id": listing.asset_id,
        "unitary_price_microalgos": listing.unitary_price.0,
        "units_left": listing.units_left,
        "seller": listing.seller.to_string(),
        "sold_out": listing.sold_out(),
    });

    let formatted = serde_json::to_string_pretty(&json)
        .map_err(|e| format!("Failed to serialize JSON: {e}"))?;

    let mut file = fs::File::create(path).map_err(|e| format!("Failed to create file: {e}"))?;
    file.write_all(formatted.as_bytes())
        .map_err(|e| format!("Failed to write file: {e}"))?;

    Ok(format!("Exported listing {} to {path}", listing.app_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{ActionKind, ActivityStatus, MicroAlgos};
    use std::fs;

    fn sample_entries() -> Vec<ActivityEntry> {
        vec![
            ActivityEntry {
                timestamp: 1700000000,
                kind: ActionKind::Create,
                app_id: 1002,
                tx_id: Some("TX1".to_string()),
                note: "3 units listed".to_string(),
                status: ActivityStatus::Confirmed,
            },
            ActivityEntry {
                timestamp: 1700000012,
                kind: ActionKind::Buy,
                app_id: 1002,
                tx_id: None,
                note: "rejected by daemon".to_string(),
                status: ActivityStatus::Failed,
            },
        ]
    }

    #[test]
    fn test_export_activity_csv() {
        let entries = sample_entries();
        let path = "/tmp/asamart-test-activity.csv";
        let result = export_activity_csv(&entries, path);
        assert!(result.is_ok());

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("timestamp"));
        assert!(contents.contains("Create App"));
        assert!(contents.contains("rejected by daemon"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_export_activity_csv_empty() {
        let path = "/tmp/asamart-test-activity-empty.csv";
        let result = export_activity_csv(&[], path);
        assert!(result.is_ok());
        assert!(result.unwrap().contains("0 entries"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_export_listing_json() {
        let listing = Listing {
            app_id: 1002,
            asset_id: 7,
            unitary_price: MicroAlgos(1_000_000),
            units_left: 10,
            seller: Address([0x01; 32]),
        };
        let path = "/tmp/asamart-test-listing.json";
        let result = export_listing_json(&listing, path);
        assert!(result.is_ok());

        let contents = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["app_id"], 1002);
        assert_eq!(value["units_left"], 10);
        assert_eq!(value["sold_out"], false);
        assert_eq!(
            value["app_address"],
            Address::for_application(1002).to_string()
        );

        let _ = fs::remove_file(path);
    }
}
