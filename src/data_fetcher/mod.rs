pub mod api;
pub mod cache;
pub mod models;

pub use api::{GameFilter, fetch_player_games, fetch_profiles};
pub use cache::{CachedProfile, ProfileCache};
pub use models::{GameRecord, PlayerProfile};
