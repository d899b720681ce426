use chrono::{DateTime, Utc};

use crate::data::address::Address;
use crate::data::types::MicroAlgos;

/// Truncate an Algorand address to "ABCDEFGH...WXYZ" format
pub fn truncate_address(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Truncate a transaction id to "ABCDEFGH...WXYZ" format
pub fn truncate_txid(txid: &str) -> String {
    if txid.len() > 14 {
        format!("{}...{}", &txid[..8], &txid[txid.len() - 4..])
    } else {
        txid.to_string()
    }
}

/// Format a microalgo amount as ALGO with reasonable precision
pub fn format_algos(amount: MicroAlgos) -> String {
    format!("{} ALGO", format_base_units(amount.0, 6))
}

/// Format a base-unit value as decimal with given decimals
pub fn format_base_units(value: u64, decimals: u8) -> String {
    if decimals == 0 {
        return format_number(value);
    }
    if value == 0 {
        return "0.0".to_string();
    }

    let divisor = 10u64.pow(decimals as u32);
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder == 0 {
        return format!("{whole}.0");
    }

    let padded = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');

    // Limit to 6 decimal places
    let decimals_shown = trimmed.len().min(6);
    format!("{whole}.{}", &trimmed[..decimals_shown])
}

/// Format a number with comma separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a Unix timestamp as "Xm ago", "Xh ago", etc.
pub fn format_time_ago(timestamp: u64) -> String {
    let now = Utc::now().timestamp() as u64;
    if timestamp > now {
        return "just now".to_string();
    }
    let diff = now - timestamp;
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Format a Unix timestamp as a datetime string
pub fn format_timestamp(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%b %d, %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
