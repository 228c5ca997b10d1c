//! Cache data structures with TTL support

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data_fetcher::models::PlayerProfile;

/// Cached profile fields used for name matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedProfile {
    /// `None` when the player left the name blank. A cached `None` is still a
    /// hit: the profile was fetched and has nothing to offer.
    pub display_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl CachedProfile {
    /// Creates a cache entry from a fetched profile
    pub fn from_profile(profile: &PlayerProfile, fetched_at: DateTime<Utc>) -> Self {
        Self {
            display_name: profile.display_name().map(str::to_string),
            title: profile.title.clone(),
            country: profile.country_code().map(str::to_string),
            fetched_at,
        }
    }

    /// Checks if the entry is older than `ttl` at `now`
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now - self.fetched_at;
        let is_expired = age > ttl;

        debug!(
            "Cache expiration check: age={}s, ttl={}s, is_expired={}",
            age.num_seconds(),
            ttl.num_seconds(),
            is_expired
        );

        is_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_keeps_matching_fields() {
        let profile = PlayerProfile {
            username: "magnuscarlsen".to_string(),
            name: Some("  Magnus Carlsen ".to_string()),
            title: Some("GM".to_string()),
            country: Some("https://api.chess.com/pub/country/NO".to_string()),
        };
        let now = Utc::now();
        let cached = CachedProfile::from_profile(&profile, now);

        assert_eq!(cached.display_name.as_deref(), Some("Magnus Carlsen"));
        assert_eq!(cached.title.as_deref(), Some("GM"));
        assert_eq!(cached.country.as_deref(), Some("NO"));
        assert_eq!(cached.fetched_at, now);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let ttl = Duration::days(7);
        let entry = |age: Duration| CachedProfile {
            display_name: None,
            title: None,
            country: None,
            fetched_at: now - age,
        };

        assert!(!entry(Duration::days(6)).is_expired(ttl, now));
        assert!(!entry(ttl).is_expired(ttl, now));
        assert!(entry(Duration::days(8)).is_expired(ttl, now));
    }
}
