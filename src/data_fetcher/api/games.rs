//! Game-history retrieval and per-game filtering

use chrono::NaiveDate;
use reqwest::Client;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use super::date_logic::{game_timestamp, month_range};
use super::fetch_utils::fetch;
use super::urls::{build_archives_url, build_monthly_games_url, parse_archive_month};
use crate::config::Config;
use crate::data_fetcher::models::{
    ApiGame, ArchivesResponse, Color, GameRecord, MonthlyGamesResponse,
};
use crate::error::AppError;

/// Which games count toward the analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFilter {
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub include_unrated: bool,
    /// Lowercase time classes, e.g. `["blitz"]`
    pub time_classes: Vec<String>,
}

impl GameFilter {
    /// Rated blitz games in `[since, until]`
    pub fn new(since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            since,
            until,
            include_unrated: false,
            time_classes: vec!["blitz".to_string()],
        }
    }

    pub fn include_unrated(mut self, include: bool) -> Self {
        self.include_unrated = include;
        self
    }

    /// Replaces the allowed time classes. Empty entries are dropped.
    pub fn time_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.time_classes = classes
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    fn contains_date(&self, date: NaiveDate) -> bool {
        self.since <= date && date <= self.until
    }
}

/// Score for the player's own result code; `None` drops the game.
///
/// # Example
/// ```
/// use fide_bands::data_fetcher::api::score_for_result;
///
/// assert_eq!(score_for_result("win"), Some(1.0));
/// assert_eq!(score_for_result("repetition"), Some(0.5));
/// assert_eq!(score_for_result("timeout"), Some(0.0));
/// assert_eq!(score_for_result("bughousepartnerlose"), None);
/// ```
pub fn score_for_result(code: &str) -> Option<f64> {
    match code {
        "win" => Some(1.0),
        "agreed" | "repetition" | "stalemate" | "timevsinsufficient" | "insufficient"
        | "50move" => Some(0.5),
        "checkmated" | "lose" | "timeout" | "resigned" | "abandoned" => Some(0.0),
        _ => None,
    }
}

/// Converts a raw game into a record from `player`'s side.
///
/// Returns `None` when the game is unrated (unless allowed), has another
/// time class, does not involve `player`, has an unknown result code or has
/// no timestamp. The date range is checked separately.
pub fn parse_game_for_player(
    game: &ApiGame,
    player: &str,
    filter: &GameFilter,
) -> Option<GameRecord> {
    if !filter.include_unrated && game.rated != Some(true) {
        return None;
    }

    let time_class = game.time_class.as_deref()?.to_lowercase();
    if !filter.time_classes.contains(&time_class) {
        return None;
    }

    let player = player.to_lowercase();
    let (me, opponent, opponent_color) = if game.white.username.to_lowercase() == player {
        (&game.white, &game.black, Color::Black)
    } else if game.black.username.to_lowercase() == player {
        (&game.black, &game.white, Color::White)
    } else {
        return None;
    };

    let score = score_for_result(&me.result)?;
    let end_time = game_timestamp(game.end_time, game.start_time)?;

    Some(GameRecord {
        end_time,
        opponent_handle: opponent.username.to_lowercase(),
        score,
        opponent_game_rating: opponent.rating.filter(|r| *r > 0),
        player_game_rating: me.rating.filter(|r| *r > 0),
        opponent_color,
        tournament_label: game.tournament.clone(),
        url: game.url.clone(),
    })
}

/// Keeps only Titled Tuesday games (label contains "titled" and "tuesday").
pub fn filter_titled_tuesday(games: Vec<GameRecord>) -> Vec<GameRecord> {
    games
        .into_iter()
        .filter(|game| {
            let label = game
                .tournament_label
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            label.contains("titled") && label.contains("tuesday")
        })
        .collect()
}

/// Lists the archive month URLs for a player.
#[instrument(skip(client, config))]
pub async fn fetch_archives(
    client: &Client,
    config: &Config,
    handle: &str,
) -> Result<Vec<String>, AppError> {
    let url = build_archives_url(&config.api_domain, handle);
    let response: ArchivesResponse = fetch(client, &url).await?;
    debug!("Found {} archive months", response.archives.len());
    Ok(response.archives)
}

/// Fetches one month of games. A 404 means no games that month.
#[instrument(skip(client, config))]
pub async fn fetch_monthly_games(
    client: &Client,
    config: &Config,
    handle: &str,
    year: i32,
    month: u32,
) -> Result<Vec<ApiGame>, AppError> {
    let url = build_monthly_games_url(&config.api_domain, handle, year, month);
    match fetch::<MonthlyGamesResponse>(client, &url).await {
        Ok(response) => {
            debug!("Found {} games for {year}-{month:02}", response.games.len());
            Ok(response.games)
        }
        Err(e) if e.is_not_found() => {
            debug!("No games for {year}-{month:02}");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Fetches every game of `handle` that passes `filter`, oldest month first.
///
/// Months are taken from the archive list when it is available; when the
/// list is empty or cannot be fetched, every month in the range is
/// requested directly.
#[instrument(skip(client, config, filter), fields(since = %filter.since, until = %filter.until))]
pub async fn fetch_player_games(
    client: &Client,
    config: &Config,
    handle: &str,
    filter: &GameFilter,
) -> Result<Vec<GameRecord>, AppError> {
    let wanted = month_range(filter.since, filter.until);

    let months: Vec<(i32, u32)> = match fetch_archives(client, config, handle).await {
        Ok(archives) if !archives.is_empty() => {
            let listed: BTreeSet<(i32, u32)> = archives
                .iter()
                .filter_map(|url| parse_archive_month(url))
                .collect();
            wanted.into_iter().filter(|m| listed.contains(m)).collect()
        }
        Ok(_) => {
            warn!("Archive list for {handle} is empty, fetching months directly");
            wanted
        }
        Err(e) => {
            warn!("Archive list for {handle} unavailable ({e}), fetching months directly");
            wanted
        }
    };

    let mut records = Vec::new();
    let mut seen = 0usize;
    for (year, month) in months {
        let games = fetch_monthly_games(client, config, handle, year, month).await?;
        seen += games.len();
        records.extend(
            games
                .iter()
                .filter_map(|game| parse_game_for_player(game, handle, filter))
                .filter(|record| filter.contains_date(record.end_time.date_naive())),
        );
    }

    info!(
        "Kept {} of {} games for {} between {} and {}",
        records.len(),
        seen,
        handle,
        filter.since,
        filter.until
    );
    Ok(records)
}
