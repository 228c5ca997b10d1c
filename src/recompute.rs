//! Re-bands an exported opponent breakdown without fetching anything
//!
//! Each opponent row carries its game count, score, mean opponent rating and
//! resolved federation rating, so band statistics can be rebuilt from the
//! per-opponent totals alone.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::bands::{Band, RatingSource, classify_for};
use crate::error::AppError;
use crate::performance::{BandBucket, BucketStats, PerformanceSummary};

/// The columns of an opponent breakdown CSV that re-banding needs.
/// Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakdownRecord {
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub games: usize,
    pub score: f64,
    pub avg_opponent_rating: f64,
    #[serde(default)]
    pub resolved_rating: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    pub summary: PerformanceSummary,
    /// Opponents per observed band, in rank order
    pub band_opponents: Vec<(Band, usize)>,
    /// Opponents left out for lacking a rating or being below the floor
    pub excluded_opponents: usize,
    /// Opponents in the top band, highest rated first
    pub top_band: Vec<BreakdownRecord>,
}

/// Parses breakdown CSV text.
pub fn parse_breakdown(text: &str) -> Result<Vec<BreakdownRecord>, AppError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let records = reader
        .deserialize()
        .collect::<Result<Vec<BreakdownRecord>, csv::Error>>()?;
    Ok(records)
}

#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn read_breakdown(path: impl AsRef<Path>) -> Result<Vec<BreakdownRecord>, AppError> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let records = parse_breakdown(&text)?;
    debug!("Read {} opponent rows", records.len());
    Ok(records)
}

/// Bands every opponent by its resolved rating and folds the per-opponent
/// totals into band and overall buckets.
///
/// Opponents without a resolved rating, rated below `min_opp`, or with no
/// games are excluded. Mean opponent ratings are weighted by game count.
pub fn recompute(records: &[BreakdownRecord], min_opp: u32) -> Recomputed {
    let mut buckets: BTreeMap<Band, (BucketStats, usize)> = BTreeMap::new();
    let mut overall = BucketStats::default();
    let mut excluded_opponents = 0usize;
    let mut top_band = Vec::new();

    for record in records {
        let band = record
            .resolved_rating
            .filter(|r| *r >= min_opp)
            .and_then(|r| classify_for(RatingSource::Federation, Some(r)));
        let Some(band) = band.filter(|_| record.games > 0) else {
            excluded_opponents += 1;
            continue;
        };

        let totals =
            BucketStats::from_totals(record.games, record.score, record.avg_opponent_rating);
        let (stats, opponents) = buckets.entry(band).or_default();
        stats.merge(&totals);
        *opponents += 1;
        overall.merge(&totals);

        if band == Band::B800Plus {
            top_band.push(record.clone());
        }
    }
    top_band.sort_by(|a, b| b.resolved_rating.cmp(&a.resolved_rating));

    info!(
        "Re-banded {} opponents ({} excluded), {} games",
        records.len() - excluded_opponents,
        excluded_opponents,
        overall.games
    );

    let band_opponents = buckets.iter().map(|(band, (_, n))| (*band, *n)).collect();
    Recomputed {
        summary: PerformanceSummary {
            bands: buckets
                .into_iter()
                .map(|(band, (stats, _))| BandBucket { band, stats })
                .collect(),
            overall,
        },
        band_opponents,
        excluded_opponents,
        top_band,
    }
}
