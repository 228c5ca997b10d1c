use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::bands::rating_from_json;

/// `/player/{handle}/games/archives`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ArchivesResponse {
    #[serde(default)]
    pub archives: Vec<String>,
}

/// `/player/{handle}/games/{yyyy}/{mm}`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MonthlyGamesResponse {
    #[serde(default)]
    pub games: Vec<ApiGame>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiGame {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub rated: Option<bool>,
    #[serde(default)]
    pub time_class: Option<String>,
    #[serde(default)]
    pub white: ApiGamePlayer,
    #[serde(default)]
    pub black: ApiGamePlayer,
    /// Tournament URL, e.g. `.../tournament/late-titled-tuesday-blitz-...`
    #[serde(default)]
    pub tournament: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiGamePlayer {
    #[serde(default)]
    pub username: String,
    /// Invalid values (negative, non-numeric) read as absent instead of
    /// failing the whole month
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<u32>,
    #[serde(default)]
    pub result: String,
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(rating_from_json))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// One accepted game, seen from the analysed player's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub end_time: DateTime<Utc>,
    /// Lowercase
    pub opponent_handle: String,
    /// 1, 0.5 or 0
    pub score: f64,
    /// Opponent's rating on the platform at the time of the game
    pub opponent_game_rating: Option<u32>,
    /// The analysed player's own platform rating in this game
    pub player_game_rating: Option<u32>,
    pub opponent_color: Color,
    pub tournament_label: Option<String>,
    pub url: Option<String>,
}
