pub mod date_logic;
pub(crate) mod fetch_utils;
pub mod games;
pub mod http_client;
pub mod profiles;
pub mod rating_history;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::{create_http_client, create_http_client_with_timeout};
// Re-export date handling
pub use date_logic::{game_timestamp, month_range, parse_date, validate_date_range};
// Re-export fetch functions
pub use games::{
    GameFilter, fetch_archives, fetch_monthly_games, fetch_player_games, filter_titled_tuesday,
    parse_game_for_player, score_for_result,
};
pub use profiles::{fetch_player_profile, fetch_profiles};
pub use rating_history::{
    average_own_rating, fetch_rating_average, fetch_two_year_averages, history_filter,
};
