//! Application-wide constants and configuration values
//!
//! Rating thresholds, registry column labels, HTTP tuning and environment
//! variable names live here so the rest of the crate has no magic numbers.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Default public API root for game histories and player profiles
pub const DEFAULT_API_DOMAIN: &str = "https://api.chess.com/pub";

/// Default User-Agent sent with API requests. The public API rejects
/// requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("fide_bands/", env!("CARGO_PKG_VERSION"));

/// Default minimum rating for registry entries and analysed opponents
pub const DEFAULT_MIN_RATING: u32 = 2500;

/// Maximum number of profile lookups in flight at once
pub const PROFILE_FETCH_CONCURRENCY: usize = 8;

/// Maximum number of opponent game histories fetched at once. Each history
/// is dozens of monthly requests, so this stays below the profile limit.
pub const HISTORY_FETCH_CONCURRENCY: usize = 4;

/// How far before the analysis start the two-year rating average reaches
pub const RATING_HISTORY_MONTHS: u32 = 24;

/// Fixed-width registry format
pub mod registry {
    /// Header must contain both of these labels
    pub const HEADER_ID_LABEL: &str = "ID Number";
    pub const HEADER_NAME_LABEL: &str = "Name";

    /// Federation column label; the name field ends where it starts
    pub const FED_LABEL: &str = "Fed";

    /// Width of the player id prefix on every record line
    pub const ID_WIDTH: usize = 10;

    /// Width of every rating column
    pub const RATING_WIDTH: usize = 5;

    /// Names the registry uses for "no name"
    pub const PLACEHOLDER_NAMES: [&str; 2] = ["-", "-, -"];

    /// Zipped combined (standard, rapid, blitz) player list
    pub const DOWNLOAD_URL: &str = "http://ratings.fide.com/download/players_list.zip";

    /// File name of the list inside the archive
    pub const LIST_FILE_NAME: &str = "players_list_foa.txt";
}

/// Band lower bounds, inclusive
pub mod bands {
    pub const BAND_500_MIN: u32 = 2500;
    pub const BAND_600_MIN: u32 = 2600;
    pub const BAND_700_MIN: u32 = 2700;
    pub const BAND_800_MIN: u32 = 2800;
}

/// Performance rating estimator
pub mod performance {
    /// Offset used for perfect and zero scores, where the logistic
    /// estimator diverges
    pub const PERFECT_SCORE_OFFSET: f64 = 800.0;

    /// Logistic scale of the Elo system
    pub const ELO_SCALE: f64 = 400.0;
}

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// Profiles change rarely; a week is fresh enough for name matching
    pub const PROFILE_SECONDS: i64 = 7 * 24 * 3600;
}

/// Cache capacities
pub mod cache_size {
    /// In-memory profile cache capacity (entries)
    pub const PROFILES: usize = 4096;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "FIDE_BANDS_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "FIDE_BANDS_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "FIDE_BANDS_HTTP_TIMEOUT";

    /// Environment variable for the data directory (index, caches, reports)
    pub const DATA_DIR: &str = "FIDE_BANDS_DATA_DIR";
}

/// Retry configuration
pub mod retry {
    /// Maximum number of retries for a single request
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 800;

    /// Jitter applied to each backoff step (+/- fraction of the step)
    pub const JITTER_FRACTION: f64 = 0.2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds_are_strictly_increasing() {
        assert!(bands::BAND_500_MIN < bands::BAND_600_MIN);
        assert!(bands::BAND_600_MIN < bands::BAND_700_MIN);
        assert!(bands::BAND_700_MIN < bands::BAND_800_MIN);
        assert_eq!(DEFAULT_MIN_RATING, bands::BAND_500_MIN);
    }

    #[test]
    fn test_retry_constants_are_reasonable() {
        assert!(retry::MAX_RETRIES > 0);
        assert!(retry::BASE_DELAY_MS > 0);
        assert!(retry::JITTER_FRACTION > 0.0 && retry::JITTER_FRACTION < 1.0);
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [
            env_vars::API_DOMAIN,
            env_vars::LOG_FILE,
            env_vars::HTTP_TIMEOUT,
            env_vars::DATA_DIR,
        ] {
            assert!(name.starts_with("FIDE_BANDS_"), "{name}");
        }
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("fide_bands/"));
        assert!(DEFAULT_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
