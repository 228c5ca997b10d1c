//! Profile cache with LRU eviction, TTL expiry and a JSON file lifecycle
//!
//! The cache is an explicit object owned by the command that runs the
//! analysis. It is loaded once before profiles are fetched and saved once
//! afterwards.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use super::types::CachedProfile;
use crate::constants::{cache_size, cache_ttl};
use crate::error::AppError;

/// File name of the persisted cache inside the data directory
pub const PROFILE_CACHE_FILE: &str = "profile_cache.json";

#[derive(Debug)]
pub struct ProfileCache {
    entries: LruCache<String, CachedProfile>,
    ttl: Duration,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileCache {
    /// Empty cache with the default capacity and a seven-day TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(cache_ttl::PROFILE_SECONDS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(cache_size::PROFILES).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Returns the entry for `handle` if it is still fresh at `now`.
    /// Expired entries are removed.
    pub fn get_fresh(&mut self, handle: &str, now: DateTime<Utc>) -> Option<CachedProfile> {
        let key = handle.to_lowercase();
        let ttl = self.ttl;

        match self.entries.get(&key) {
            Some(entry) if !entry.is_expired(ttl, now) => {
                debug!("Profile cache hit: {key}");
                Some(entry.clone())
            }
            Some(_) => {
                debug!("Removing expired profile cache entry: {key}");
                self.entries.pop(&key);
                None
            }
            None => {
                debug!("Profile cache miss: {key}");
                None
            }
        }
    }

    pub fn insert(&mut self, handle: &str, profile: CachedProfile) {
        self.entries.put(handle.to_lowercase(), profile);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a cache file. A missing file yields an empty cache; entries that
    /// are already expired are dropped.
    #[instrument]
    pub async fn load_from_path(path: &Path) -> Result<Self, AppError> {
        let mut cache = Self::new();
        if !tokio::fs::try_exists(path).await? {
            debug!("No profile cache at {}", path.display());
            return Ok(cache);
        }

        let content = tokio::fs::read_to_string(path).await?;
        let stored: BTreeMap<String, CachedProfile> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable profile cache {}: {}", path.display(), e);
                return Ok(cache);
            }
        };

        let now = Utc::now();
        let total = stored.len();
        for (handle, profile) in stored {
            if !profile.is_expired(cache.ttl, now) {
                cache.insert(&handle, profile);
            }
        }

        info!(
            "Loaded {} of {} cached profiles from {}",
            cache.len(),
            total,
            path.display()
        );
        Ok(cache)
    }

    /// Writes fresh entries as a JSON object keyed by handle.
    #[instrument(skip(self))]
    pub async fn save_to_path(&self, path: &Path) -> Result<(), AppError> {
        let now = Utc::now();
        let fresh: BTreeMap<&str, &CachedProfile> = self
            .entries
            .iter()
            .filter(|(_, profile)| !profile.is_expired(self.ttl, now))
            .map(|(handle, profile)| (handle.as_str(), profile))
            .collect();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&fresh)?;
        tokio::fs::write(path, content).await?;

        info!("Saved {} profiles to {}", fresh.len(), path.display());
        Ok(())
    }
}
