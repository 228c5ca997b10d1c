//! Joins fetched games with resolved identities and runs the band aggregation
//!
//! Everything here is synchronous and pure: games and profiles are fetched
//! beforehand, so this module only looks things up in the rating index.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

use crate::bands::{RatingSource, classify_for};
use crate::constants::DEFAULT_MIN_RATING;
use crate::data_fetcher::cache::CachedProfile;
use crate::data_fetcher::models::{Color, GameRecord};
use crate::performance::{BucketStats, GameOutcome, PerformanceSummary, aggregate};
use crate::registry::RatingIndex;
use crate::resolver::{MatchResult, MatchStrategy, Query, resolve_batch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub rating_source: RatingSource,
    /// Games against opponents rated below this are left out
    pub min_opp: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rating_source: RatingSource::default(),
            min_opp: DEFAULT_MIN_RATING,
        }
    }
}

/// One analysed game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRow {
    pub end_time: String,
    pub opponent_handle: String,
    pub opponent_color: Color,
    pub score: f64,
    /// Rating the band was taken from
    pub band_rating: u32,
    pub band: String,
    pub url: Option<String>,
}

/// Results against one opponent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentRow {
    pub handle: String,
    pub display_name: Option<String>,
    pub games: usize,
    pub score: f64,
    pub score_pct: f64,
    pub avg_opponent_rating: f64,
    pub resolved_rating: Option<u32>,
    pub matched_name: Option<String>,
    pub match_strategy: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: PerformanceSummary,
    /// Sorted by games, then score (both descending), then handle
    pub opponents: Vec<OpponentRow>,
    pub games: Vec<GameRow>,
    /// Every distinct opponent, resolved or not
    pub resolutions: BTreeMap<String, MatchResult>,
    /// Opponents whose profile carried a name
    pub display_names: BTreeMap<String, String>,
    /// Games dropped for lacking a band or being below `min_opp`
    pub excluded_games: usize,
}

/// Builds one query per distinct opponent, in handle order.
///
/// The display name comes from the opponent's profile when there is one.
///
/// The most recent in-game rating is passed as the tie-break hint. It is a
/// platform rating, which for titled players usually sits above their
/// federation rating, so it is used unadjusted: a hint above every candidate
/// picks the highest-rated one, the same pick as having no hint at all.
pub fn build_queries(
    games: &[GameRecord],
    profiles: &HashMap<String, CachedProfile>,
) -> Vec<Query> {
    let mut latest: BTreeMap<&str, &GameRecord> = BTreeMap::new();
    for game in games {
        latest
            .entry(game.opponent_handle.as_str())
            .and_modify(|seen| {
                if game.end_time > seen.end_time {
                    *seen = game;
                }
            })
            .or_insert(game);
    }

    latest
        .into_iter()
        .map(|(handle, game)| {
            let mut query = Query::new(handle);
            if let Some(name) = profiles
                .get(handle)
                .and_then(|profile| profile.display_name.as_deref())
            {
                query = query.with_display_name(name);
            }
            if let Some(rating) = game.opponent_game_rating {
                query = query.with_rating_hint(rating);
            }
            query
        })
        .collect()
}

/// Resolves every opponent, bands each game and aggregates the results.
pub fn analyze(
    games: &[GameRecord],
    profiles: &HashMap<String, CachedProfile>,
    index: &RatingIndex,
    options: &AnalysisOptions,
) -> Analysis {
    analyze_with_averages(games, profiles, index, &HashMap::new(), options)
}

/// [`analyze`] with each opponent's two-year average rating, keyed by
/// lowercase handle. The averages are only read for
/// [`RatingSource::TwoYearAvg`]; opponents missing from the map are excluded.
#[instrument(skip_all, fields(games = games.len(), source = %options.rating_source))]
pub fn analyze_with_averages(
    games: &[GameRecord],
    profiles: &HashMap<String, CachedProfile>,
    index: &RatingIndex,
    averages: &HashMap<String, u32>,
    options: &AnalysisOptions,
) -> Analysis {
    let queries = build_queries(games, profiles);
    let results = resolve_batch(&queries, index);
    let resolutions: BTreeMap<String, MatchResult> = queries
        .iter()
        .map(|q| q.handle.clone())
        .zip(results)
        .collect();

    let display_names: BTreeMap<String, String> = queries
        .iter()
        .filter_map(|q| Some((q.handle.clone(), q.display_name.clone()?)))
        .collect();

    let mut outcomes = Vec::new();
    let mut rows = Vec::new();
    let mut per_opponent: BTreeMap<&str, BucketStats> = BTreeMap::new();
    let mut excluded_games = 0usize;

    for game in games {
        let resolved = resolutions.get(&game.opponent_handle);
        let rating = match options.rating_source {
            RatingSource::Federation => resolved.and_then(|r| r.rating),
            RatingSource::Game => game.opponent_game_rating,
            RatingSource::TwoYearAvg => averages.get(&game.opponent_handle).copied(),
        };

        let Some(rating) = rating.filter(|r| *r >= options.min_opp) else {
            excluded_games += 1;
            continue;
        };
        let Some(band) = classify_for(options.rating_source, Some(rating)) else {
            excluded_games += 1;
            continue;
        };
        let Some(outcome) = GameOutcome::new(game.score, rating) else {
            debug!("Skipping game with score {}", game.score);
            excluded_games += 1;
            continue;
        };

        outcomes.push((band, outcome));
        per_opponent
            .entry(game.opponent_handle.as_str())
            .or_default()
            .record_game(outcome);
        rows.push(GameRow {
            end_time: game.end_time.to_rfc3339(),
            opponent_handle: game.opponent_handle.clone(),
            opponent_color: game.opponent_color,
            score: game.score,
            band_rating: rating,
            band: band.label().to_string(),
            url: game.url.clone(),
        });
    }

    let summary = aggregate(outcomes);

    let mut opponents: Vec<OpponentRow> = per_opponent
        .into_iter()
        .map(|(handle, stats)| {
            let resolved = resolutions.get(handle);
            OpponentRow {
                handle: handle.to_string(),
                display_name: display_names.get(handle).cloned(),
                games: stats.games,
                score: stats.total_score,
                score_pct: stats.score_pct(),
                avg_opponent_rating: stats.mean_opponent_rating,
                resolved_rating: resolved.and_then(|r| r.rating),
                matched_name: resolved
                    .and_then(|r| r.matched_name.as_ref())
                    .map(|key| key.to_string()),
                match_strategy: resolved.map_or(MatchStrategy::None, |r| r.strategy),
            }
        })
        .collect();
    opponents.sort_by(|a, b| {
        b.games
            .cmp(&a.games)
            .then(b.score.total_cmp(&a.score))
            .then_with(|| a.handle.cmp(&b.handle))
    });

    info!(
        "Analysed {} games against {} opponents ({} excluded)",
        rows.len(),
        opponents.len(),
        excluded_games
    );

    Analysis {
        summary,
        opponents,
        games: rows,
        resolutions,
        display_names,
        excluded_games,
    }
}
