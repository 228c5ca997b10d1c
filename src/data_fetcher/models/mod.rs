pub mod games;
pub mod profile;

pub use games::{ApiGame, ApiGamePlayer, ArchivesResponse, Color, GameRecord, MonthlyGamesResponse};
pub use profile::PlayerProfile;
