//! URL building utilities for API endpoints

/// Builds the URL listing a player's monthly game archives.
///
/// # Arguments
/// * `api_domain` - The base API domain
/// * `handle` - Player handle, any case
///
/// # Example
/// ```
/// use fide_bands::data_fetcher::api::build_archives_url;
///
/// let url = build_archives_url("https://api.example.com/pub", "Hikaru");
/// assert_eq!(url, "https://api.example.com/pub/player/hikaru/games/archives");
/// ```
pub fn build_archives_url(api_domain: &str, handle: &str) -> String {
    format!("{api_domain}/player/{}/games/archives", handle.to_lowercase())
}

/// Builds the URL of one month of a player's games.
///
/// # Example
/// ```
/// use fide_bands::data_fetcher::api::build_monthly_games_url;
///
/// let url = build_monthly_games_url("https://api.example.com/pub", "hikaru", 2024, 3);
/// assert_eq!(url, "https://api.example.com/pub/player/hikaru/games/2024/03");
/// ```
pub fn build_monthly_games_url(api_domain: &str, handle: &str, year: i32, month: u32) -> String {
    format!(
        "{api_domain}/player/{}/games/{year}/{month:02}",
        handle.to_lowercase()
    )
}

/// Builds a player profile URL.
///
/// # Example
/// ```
/// use fide_bands::data_fetcher::api::build_profile_url;
///
/// let url = build_profile_url("https://api.example.com/pub", "MagnusCarlsen");
/// assert_eq!(url, "https://api.example.com/pub/player/magnuscarlsen");
/// ```
pub fn build_profile_url(api_domain: &str, handle: &str) -> String {
    format!("{api_domain}/player/{}", handle.to_lowercase())
}

/// Extracts `(year, month)` from an archive URL ending in `/{yyyy}/{mm}`.
///
/// # Example
/// ```
/// use fide_bands::data_fetcher::api::parse_archive_month;
///
/// assert_eq!(parse_archive_month("https://x/player/h/games/2024/03"), Some((2024, 3)));
/// assert_eq!(parse_archive_month("https://x/player/h/games/2024/03/"), Some((2024, 3)));
/// assert_eq!(parse_archive_month("https://x/player/h/games"), None);
/// ```
pub fn parse_archive_month(archive_url: &str) -> Option<(i32, u32)> {
    let mut parts = archive_url.trim_end_matches('/').rsplit('/');
    let month = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}
