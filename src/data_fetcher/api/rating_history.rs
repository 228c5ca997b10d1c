//! Opponents' own rating histories, for banding by a two-year average

use chrono::{Months, NaiveDate};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument, warn};

use super::games::{GameFilter, fetch_player_games};
use crate::config::Config;
use crate::constants::{HISTORY_FETCH_CONCURRENCY, RATING_HISTORY_MONTHS};
use crate::data_fetcher::models::GameRecord;
use crate::error::AppError;

/// Rated blitz games from two years before `since` through `until`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fide_bands::data_fetcher::api::history_filter;
///
/// let since = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
/// let until = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
/// let filter = history_filter(since, until);
/// assert_eq!(filter.since, NaiveDate::from_ymd_opt(2022, 3, 31).unwrap());
/// assert_eq!(filter.until, until);
/// ```
pub fn history_filter(since: NaiveDate, until: NaiveDate) -> GameFilter {
    let start = since
        .checked_sub_months(Months::new(RATING_HISTORY_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    GameFilter::new(start, until)
}

/// Mean of the player's own ratings across their games, rounded.
/// Games without a rating are skipped; `None` when none had one.
pub fn average_own_rating(games: &[GameRecord]) -> Option<u32> {
    let ratings: Vec<u32> = games.iter().filter_map(|g| g.player_game_rating).collect();
    if ratings.is_empty() {
        return None;
    }
    let total: u64 = ratings.iter().map(|r| u64::from(*r)).sum();
    Some((total as f64 / ratings.len() as f64).round() as u32)
}

/// Fetches one opponent's games in `filter` and averages their own rating.
#[instrument(skip(client, config, filter))]
pub async fn fetch_rating_average(
    client: &Client,
    config: &Config,
    handle: &str,
    filter: &GameFilter,
) -> Result<Option<u32>, AppError> {
    let games = fetch_player_games(client, config, handle, filter).await?;
    let average = average_own_rating(&games);
    debug!("{handle}: {} games, average {average:?}", games.len());
    Ok(average)
}

/// Two-year average rating for every distinct handle.
///
/// Opponents whose history cannot be fetched, or who have no rated blitz
/// games in the window, are left out of the map and so stay unbanded.
#[instrument(skip(client, config, handles), fields(handles = handles.len()))]
pub async fn fetch_two_year_averages(
    client: &Client,
    config: &Config,
    handles: &[String],
    since: NaiveDate,
    until: NaiveDate,
) -> HashMap<String, u32> {
    let filter = history_filter(since, until);
    let distinct: BTreeSet<String> = handles.iter().map(|h| h.to_lowercase()).collect();
    info!(
        "Fetching rating histories of {} opponents between {} and {}",
        distinct.len(),
        filter.since,
        filter.until
    );

    let fetched: Vec<(String, Result<Option<u32>, AppError>)> = stream::iter(distinct)
        .map(|handle| {
            let filter = &filter;
            async move {
                let result = fetch_rating_average(client, config, &handle, filter).await;
                (handle, result)
            }
        })
        .buffer_unordered(HISTORY_FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut averages = HashMap::new();
    for (handle, result) in fetched {
        match result {
            Ok(Some(average)) => {
                averages.insert(handle, average);
            }
            Ok(None) => debug!("No rated blitz games for {handle} in the history window"),
            Err(e) => warn!("Rating history for {handle} unavailable: {e}"),
        }
    }
    info!("Averaged ratings for {} opponents", averages.len());
    averages
}
