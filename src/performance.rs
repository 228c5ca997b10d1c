//! Per-band performance statistics.
//!
//! Games are grouped by the opponent's band; each group and the overall
//! total get a game count, score, score percentage, mean opponent rating
//! and an Elo-style performance rating.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bands::Band;
use crate::constants::performance::{ELO_SCALE, PERFECT_SCORE_OFFSET};

/// One game from the analysed player's point of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOutcome {
    /// 0, 0.5 or 1
    pub score: f64,
    pub opponent_rating: u32,
}

impl GameOutcome {
    /// Returns `None` unless `score` is a win, draw or loss.
    pub fn new(score: f64, opponent_rating: u32) -> Option<Self> {
        [0.0, 0.5, 1.0]
            .contains(&score)
            .then_some(Self {
                score,
                opponent_rating,
            })
    }
}

/// Elo performance rating for `score` points from `games` games against an
/// average rating of `avg_opp`.
///
/// Zero and perfect scores are pinned at ±800 where the logistic formula
/// diverges. No games gives NaN.
///
/// # Examples
/// ```
/// use fide_bands::performance::perf_rating;
///
/// assert_eq!(perf_rating(0.0, 5, 2600.0), 1800.0);
/// assert_eq!(perf_rating(5.0, 5, 2600.0), 3400.0);
/// assert_eq!(perf_rating(2.5, 5, 2600.0), 2600.0);
/// assert!(perf_rating(0.0, 0, 2600.0).is_nan());
/// ```
pub fn perf_rating(score: f64, games: usize, avg_opp: f64) -> f64 {
    if games == 0 {
        return f64::NAN;
    }
    let n = games as f64;
    if score <= 0.0 {
        return avg_opp - PERFECT_SCORE_OFFSET;
    }
    if score >= n {
        return avg_opp + PERFECT_SCORE_OFFSET;
    }
    avg_opp + ELO_SCALE * (score / (n - score)).log10()
}

/// Running totals for one group of games
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketStats {
    pub games: usize,
    pub total_score: f64,
    pub mean_opponent_rating: f64,
}

impl BucketStats {
    /// Bucket from totals that were already aggregated elsewhere
    pub fn from_totals(games: usize, total_score: f64, mean_opponent_rating: f64) -> Self {
        if games == 0 {
            return Self::default();
        }
        Self {
            games,
            total_score,
            mean_opponent_rating,
        }
    }

    pub fn record_game(&mut self, outcome: GameOutcome) {
        self.games += 1;
        self.total_score += outcome.score;

        // Rolling mean avoids keeping every rating around
        let rating = f64::from(outcome.opponent_rating);
        if self.games == 1 {
            self.mean_opponent_rating = rating;
        } else {
            self.mean_opponent_rating += (rating - self.mean_opponent_rating) / self.games as f64;
        }
    }

    /// Merges two buckets, weighting the opponent means by game count
    pub fn merge(&mut self, other: &BucketStats) {
        let games = self.games + other.games;
        if games == 0 {
            return;
        }
        self.mean_opponent_rating = (self.mean_opponent_rating * self.games as f64
            + other.mean_opponent_rating * other.games as f64)
            / games as f64;
        self.games = games;
        self.total_score += other.total_score;
    }

    /// Score as a percentage of games played, NaN with no games
    pub fn score_pct(&self) -> f64 {
        if self.games == 0 {
            return f64::NAN;
        }
        100.0 * self.total_score / self.games as f64
    }

    pub fn performance_rating(&self) -> f64 {
        perf_rating(self.total_score, self.games, self.mean_opponent_rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandBucket {
    pub band: Band,
    pub stats: BucketStats,
}

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceSummary {
    /// Observed bands only, in rank order
    pub bands: Vec<BandBucket>,
    pub overall: BucketStats,
}

impl PerformanceSummary {
    pub fn band(&self, band: Band) -> Option<&BandBucket> {
        self.bands.iter().find(|bucket| bucket.band == band)
    }
}

/// Serializable row used by reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub band: String,
    pub games: usize,
    pub score: f64,
    pub score_pct: f64,
    pub avg_opponent_rating: f64,
    pub performance_rating: f64,
}

impl BandRow {
    pub fn new(label: impl Into<String>, stats: &BucketStats) -> Self {
        Self {
            band: label.into(),
            games: stats.games,
            score: stats.total_score,
            score_pct: stats.score_pct(),
            avg_opponent_rating: stats.mean_opponent_rating,
            performance_rating: stats.performance_rating(),
        }
    }
}

/// Groups outcomes by band and computes statistics per band and overall.
///
/// Outcomes without a band are ignored entirely, including in the overall
/// totals.
pub fn aggregate<I>(outcomes: I) -> PerformanceSummary
where
    I: IntoIterator<Item = (Band, GameOutcome)>,
{
    let mut buckets: BTreeMap<Band, BucketStats> = BTreeMap::new();
    let mut overall = BucketStats::default();

    for (band, outcome) in outcomes {
        buckets.entry(band).or_default().record_game(outcome);
        overall.record_game(outcome);
    }

    PerformanceSummary {
        bands: buckets
            .into_iter()
            .map(|(band, stats)| BandBucket { band, stats })
            .collect(),
        overall,
    }
}
