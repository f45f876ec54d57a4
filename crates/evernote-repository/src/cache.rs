//! Optional cache of built listings.
//!
//! The host owns the actual cache service; this is the seam plus an
//! in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::listing::ListingEntry;

/// A listing split into folders and files, as stored in the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedListing {
    pub folders: Vec<ListingEntry>,
    pub files: Vec<ListingEntry>,
    /// Number of pages of the listed notes, 0 when not paged
    #[serde(default)]
    pub pages: u32,
}

impl CachedListing {
    /// Split entries into folders and files, keeping their order.
    pub fn from_entries(entries: Vec<ListingEntry>) -> Self {
        let (folders, files) = entries.into_iter().partition(ListingEntry::is_folder);
        Self {
            folders,
            files,
            pages: 0,
        }
    }
}

/// Cache key of a listing page.
pub fn cache_key(segment: &str, page: u32) -> String {
    format!("{}@{}", segment, page)
}

pub trait ListingCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CachedListing>;

    fn set(&self, key: &str, listing: &CachedListing);

    /// Drop every entry
    fn purge(&self);
}

/// In-memory cache for testing
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedListing>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ListingCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CachedListing> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, listing: &CachedListing) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), listing.clone());
        }
    }

    fn purge(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
