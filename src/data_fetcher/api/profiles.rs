//! Player profile retrieval with cache-first concurrent fetching

use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use super::fetch_utils::fetch;
use super::urls::build_profile_url;
use crate::config::Config;
use crate::constants::PROFILE_FETCH_CONCURRENCY;
use crate::data_fetcher::cache::{CachedProfile, ProfileCache};
use crate::data_fetcher::models::PlayerProfile;
use crate::error::AppError;

/// Fetches one profile. An unknown handle is `PlayerNotFound`.
#[instrument(skip(client, config))]
pub async fn fetch_player_profile(
    client: &Client,
    config: &Config,
    handle: &str,
) -> Result<PlayerProfile, AppError> {
    let url = build_profile_url(&config.api_domain, handle);
    fetch::<PlayerProfile>(client, &url).await.map_err(|e| {
        if e.is_not_found() {
            AppError::player_not_found(handle)
        } else {
            e
        }
    })
}

/// Returns a profile for every handle that could be looked up, consulting
/// the cache first and fetching the rest concurrently.
///
/// A failed fetch is logged and the handle is left out of the result, so the
/// resolver only tries the handle itself for that opponent. Fetched profiles
/// are stored in `cache`.
#[instrument(skip(client, config, cache, handles))]
pub async fn fetch_profiles(
    client: &Client,
    config: &Config,
    cache: &mut ProfileCache,
    handles: &[String],
) -> HashMap<String, CachedProfile> {
    let now = Utc::now();
    let mut profiles = HashMap::new();
    let mut missing = Vec::new();

    for handle in handles {
        let handle = handle.to_lowercase();
        if profiles.contains_key(&handle) || missing.contains(&handle) {
            continue;
        }
        match cache.get_fresh(&handle, now) {
            Some(profile) => {
                profiles.insert(handle, profile);
            }
            None => missing.push(handle),
        }
    }

    debug!(
        "{} profiles cached, {} to fetch",
        profiles.len(),
        missing.len()
    );

    let fetched: Vec<(String, Result<PlayerProfile, AppError>)> = stream::iter(missing)
        .map(|handle| async move {
            let result = fetch_player_profile(client, config, &handle).await;
            (handle, result)
        })
        .buffer_unordered(PROFILE_FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut failures = 0usize;
    for (handle, result) in fetched {
        match result {
            Ok(profile) => {
                let entry = CachedProfile::from_profile(&profile, Utc::now());
                cache.insert(&handle, entry.clone());
                profiles.insert(handle, entry);
            }
            Err(e) => {
                failures += 1;
                warn!("No profile for {handle}: {e}");
            }
        }
    }

    info!(
        "Profiles available for {} of {} handles ({} failed)",
        profiles.len(),
        handles.len(),
        failures
    );
    profiles
}
