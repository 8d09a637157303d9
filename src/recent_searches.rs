//! Recent company searches.
//!
//! A short most-recent-first list persisted as a JSON array. The whole file
//! is rewritten on every change; nothing else is kept.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{classify_io_error, DeliveryResult, StorageError};

/// Directory under the home directory holding client state.
pub const STATE_DIR: &str = ".adaptive_delivery";

/// File name of the recent-searches list.
pub const RECENT_SEARCHES_FILE: &str = "recent_searches.json";

/// Entries kept by default.
pub const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone)]
pub struct RecentSearches {
    /// Newest first.
    entries: Vec<String>,
    capacity: usize,
    path: PathBuf,
}

impl RecentSearches {
    /// `~/.adaptive_delivery/recent_searches.json`
    pub fn default_path() -> DeliveryResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(STATE_DIR).join(RECENT_SEARCHES_FILE))
            .ok_or_else(|| StorageError::NoHomeDirectory.into())
    }

    /// Load the list at `path`. A missing or unreadable file is an empty
    /// list.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let capacity = capacity.max(1);
        let mut entries = read_entries(&path);
        entries.truncate(capacity);

        Self {
            entries,
            capacity,
            path,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put `query` at the front and persist.
    ///
    /// Blank queries are ignored. A repeated query moves to the front
    /// instead of appearing twice.
    pub fn record(&mut self, query: &str) -> DeliveryResult<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        self.entries.retain(|existing| existing != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);

        self.save()
    }

    pub fn clear(&mut self) -> DeliveryResult<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> DeliveryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }

        let json = serde_json::to_string(&self.entries).map_err(|e| StorageError::Serialization {
            message: e.to_string(),
        })?;
        fs::write(&self.path, json)
            .map_err(|e| classify_io_error(e, Some(self.path.clone()), "write"))?;

        debug!(path = %self.path.display(), count = self.entries.len(), "recent searches saved");
        Ok(())
    }
}

fn read_entries(path: &Path) -> Vec<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return Vec::new(),
    };

    match serde_json::from_str::<Vec<String>>(&contents) {
        Ok(entries) => entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), "ignoring corrupt recent searches: {}", e);
            Vec::new()
        }
    }
}
