use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::data::types::SavedListing;

const BOOKMARKS_FILE: &str = "saved.json";
const APP_DIR: &str = "asamart";

/// Persistent listing bookmarks stored on disk at ~/.config/asamart/saved.json.
pub struct Bookmarks {
    pub entries: Vec<SavedListing>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Load the bookmarks from disk. Returns an empty list if the file
    /// doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = match bookmarks_path() {
            Some(p) => p,
            None => return Self::new(),
        };

        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(_) => return Self::new(),
        };

        let entries: Vec<SavedListing> = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(_) => return Self::new(),
        };

        Self { entries }
    }

    /// Save the bookmarks to disk.
    pub fn save(&self) -> Result<(), String> {
        let path = bookmarks_path().ok_or("Could not determine config directory")?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize bookmarks: {e}"))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write bookmarks: {e}"))?;

        Ok(())
    }

    /// Add an app id with a label. Returns false if already bookmarked.
    pub fn add(&mut self, app_id: u64, label: String) -> bool {
        if self.contains(app_id) {
            return false;
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.entries.push(SavedListing {
            app_id,
            label,
            added_at: now,
        });

        true
    }

    /// Remove an app id. Returns true if it was found and removed.
    pub fn remove(&mut self, app_id: u64) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| e.app_id != app_id);
        self.entries.len() < len_before
    }

    pub fn list(&self) -> &[SavedListing] {
        &self.entries
    }

    pub fn contains(&self, app_id: u64) -> bool {
        self.entries.iter().any(|e| e.app_id == app_id)
    }
}

impl Default for Bookmarks {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the path to the bookmarks file.
fn bookmarks_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join(APP_DIR).join(BOOKMARKS_FILE))
}
