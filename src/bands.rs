//! Strength bands for classifying opponents by rating.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::constants::bands::{BAND_500_MIN, BAND_600_MIN, BAND_700_MIN, BAND_800_MIN};

/// Ordered strength band. `Ord` follows rank: 500 < 600 < 700 < 800+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "500")]
    B500,
    #[serde(rename = "600")]
    B600,
    #[serde(rename = "700")]
    B700,
    #[serde(rename = "800+")]
    B800Plus,
}

impl Band {
    /// All bands in rank order
    pub const ALL: [Band; 4] = [Band::B500, Band::B600, Band::B700, Band::B800Plus];

    pub fn label(self) -> &'static str {
        match self {
            Band::B500 => "500",
            Band::B600 => "600",
            Band::B700 => "700",
            Band::B800Plus => "800+",
        }
    }

    /// Inclusive lower bound of the band
    pub fn lower_bound(self) -> u32 {
        match self {
            Band::B500 => BAND_500_MIN,
            Band::B600 => BAND_600_MIN,
            Band::B700 => BAND_700_MIN,
            Band::B800Plus => BAND_800_MIN,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the rating used for banding comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RatingSource {
    /// Resolved federation rating; all four bands
    #[default]
    Federation,
    /// The opponent's in-game rating; the platform scale has no 500 band
    Game,
    /// Mean of the opponent's own rated blitz ratings from two years before
    /// the range start to its end; platform scale, so no 500 band either
    #[value(name = "two-year-avg")]
    #[serde(rename = "two-year-avg")]
    TwoYearAvg,
}

impl RatingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            RatingSource::Federation => "federation",
            RatingSource::Game => "game",
            RatingSource::TwoYearAvg => "two-year-avg",
        }
    }

    /// Platform ratings run higher than federation ratings
    pub fn is_platform_scale(self) -> bool {
        !matches!(self, RatingSource::Federation)
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a federation rating to its band, highest threshold first.
///
/// Below 2500, or no rating at all, there is no band. That is an ordinary
/// outcome, not an error.
///
/// # Example
/// ```
/// use fide_bands::bands::{Band, classify};
///
/// assert_eq!(classify(Some(2800)), Some(Band::B800Plus));
/// assert_eq!(classify(Some(2799)), Some(Band::B700));
/// assert_eq!(classify(Some(2499)), None);
/// assert_eq!(classify(None), None);
/// ```
pub fn classify(rating: Option<u32>) -> Option<Band> {
    let rating = rating?;
    Band::ALL
        .iter()
        .rev()
        .copied()
        .find(|band| rating >= band.lower_bound())
}

/// Classifies with the table for the given rating source.
pub fn classify_for(source: RatingSource, rating: Option<u32>) -> Option<Band> {
    match classify(rating) {
        Some(Band::B500) if source.is_platform_scale() => None,
        band => band,
    }
}

/// Checks a rating that arrived as an untyped number.
///
/// Negative or non-finite input is an invalid rating: it is logged and
/// treated as absent, so the game stays unclassified. Fractions are
/// truncated.
///
/// # Example
/// ```
/// use fide_bands::bands::valid_rating;
///
/// assert_eq!(valid_rating(2650.7), Some(2650));
/// assert_eq!(valid_rating(-1.0), None);
/// assert_eq!(valid_rating(f64::NAN), None);
/// ```
pub fn valid_rating(rating: f64) -> Option<u32> {
    if !rating.is_finite() || rating < 0.0 {
        warn!("Ignoring invalid rating value {rating}");
        return None;
    }
    Some(rating.floor().min(f64::from(u32::MAX)) as u32)
}

/// Reads a rating from raw JSON. `null` is simply absent; negative,
/// non-finite and non-numeric values are invalid and also end up absent.
pub fn rating_from_json(value: &Value) -> Option<u32> {
    match value {
        Value::Null => None,
        Value::Number(number) => number.as_f64().and_then(valid_rating),
        Value::String(text) => match text.trim().parse::<f64>() {
            Ok(rating) => valid_rating(rating),
            Err(_) => {
                warn!("Ignoring non-numeric rating {text:?}");
                None
            }
        },
        other => {
            warn!("Ignoring non-numeric rating {other}");
            None
        }
    }
}
