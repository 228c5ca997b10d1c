use crate::registry::RegistryError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Non-success HTTP statuses
    #[error("Not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("Rate limited (429) by {url}")]
    ApiRateLimit {
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Server error ({status}) from {url}")]
    ApiServerError {
        status: u16,
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Request rejected ({status}) by {url}")]
    ApiClientError { status: u16, url: String },

    // Transport failures
    #[error("Timed out fetching {url}")]
    NetworkTimeout { url: String },

    #[error("Could not connect to {url}: {message}")]
    NetworkConnection { url: String, message: String },

    // Bodies that arrived but could not be used
    #[error("Response from {url} is not JSON")]
    ApiMalformedJson { url: String },

    #[error("Response from {url} has an unexpected shape: {message}")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("Empty response from {url}")]
    ApiNoData { url: String },

    #[error("Player not found: {handle}")]
    PlayerNotFound { handle: String },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Registry archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    pub fn player_not_found(handle: impl Into<String>) -> Self {
        Self::PlayerNotFound {
            handle: handle.into(),
        }
    }

    /// Maps a non-success HTTP status to its variant.
    ///
    /// `retry_after` is the parsed `Retry-After` header, kept for the
    /// statuses that are worth retrying.
    ///
    /// # Example
    /// ```
    /// use fide_bands::error::AppError;
    ///
    /// assert!(AppError::from_status(503, "https://x", None).is_retryable());
    /// assert!(!AppError::from_status(403, "https://x", None).is_retryable());
    /// assert!(AppError::from_status(404, "https://x", None).is_not_found());
    /// ```
    pub fn from_status(status: u16, url: impl Into<String>, retry_after: Option<Duration>) -> Self {
        let url = url.into();
        match status {
            404 => Self::ApiNotFound { url },
            429 => Self::ApiRateLimit { url, retry_after },
            400..=499 => Self::ApiClientError { status, url },
            _ => Self::ApiServerError {
                status,
                url,
                retry_after,
            },
        }
    }

    /// Classifies a transport-level reqwest failure for `url`.
    pub fn from_transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkTimeout { url: url.into() }
        } else if err.is_connect() {
            Self::NetworkConnection {
                url: url.into(),
                message: err.to_string(),
            }
        } else {
            Self::Http(err)
        }
    }

    /// Transient failures: rate limits, 5xx, timeouts and refused connections.
    /// Other 4xx statuses are answers, not outages.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiRateLimit { .. }
        )
    }

    /// Wait requested by the server, when it sent one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AppError::ApiRateLimit { retry_after, .. }
            | AppError::ApiServerError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Missing data rather than a failure: unknown players, empty months
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApiNotFound { .. }
                | AppError::PlayerNotFound { .. }
                | AppError::ApiNoData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        let url = "https://api.example.com/pub/player/nobody";
        assert!(matches!(
            AppError::from_status(404, url, None),
            AppError::ApiNotFound { .. }
        ));
        assert!(matches!(
            AppError::from_status(429, url, None),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            AppError::from_status(410, url, None),
            AppError::ApiClientError { status: 410, .. }
        ));
        assert!(matches!(
            AppError::from_status(502, url, None),
            AppError::ApiServerError { status: 502, .. }
        ));
        assert_eq!(
            AppError::from_status(404, url, None).to_string(),
            "Not found (404): https://api.example.com/pub/player/nobody"
        );
    }

    #[test]
    fn test_retry_classification() {
        let wait = Some(Duration::from_secs(3));
        let retryable = [
            AppError::from_status(429, "u", wait),
            AppError::from_status(500, "u", None),
            AppError::from_status(503, "u", wait),
            AppError::NetworkTimeout {
                url: "u".to_string(),
            },
            AppError::NetworkConnection {
                url: "u".to_string(),
                message: "refused".to_string(),
            },
        ];
        for error in &retryable {
            assert!(error.is_retryable(), "{error:?}");
        }

        let final_answers = [
            AppError::from_status(403, "u", wait),
            AppError::from_status(404, "u", wait),
            AppError::player_not_found("someone"),
            AppError::config_error("bad"),
            AppError::from(RegistryError::HeaderNotFound),
        ];
        for error in &final_answers {
            assert!(!error.is_retryable(), "{error:?}");
            assert_eq!(error.retry_after(), None, "{error:?}");
        }
    }

    #[test]
    fn test_retry_after_is_kept_for_transient_statuses() {
        let wait = Some(Duration::from_secs(7));
        assert_eq!(AppError::from_status(429, "u", wait).retry_after(), wait);
        assert_eq!(AppError::from_status(503, "u", wait).retry_after(), wait);
        assert_eq!(AppError::from_status(500, "u", None).retry_after(), None);
    }

    #[test]
    fn test_player_not_found_helper() {
        let error = AppError::player_not_found("hikaru");
        assert_eq!(error.to_string(), "Player not found: hikaru");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::ApiNoData { url: "u".to_string() }.is_not_found());
        assert!(!AppError::from_status(500, "u", None).is_not_found());
        assert!(!AppError::config_error("message").is_not_found());
    }

    #[test]
    fn test_registry_error_conversion() {
        let app_error: AppError = RegistryError::HeaderNotFound.into();
        assert!(matches!(
            app_error,
            AppError::Registry(RegistryError::HeaderNotFound)
        ));
        assert!(app_error.to_string().starts_with("Registry error:"));
    }

    #[test]
    fn test_archive_error_conversion() {
        let app_error: AppError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(app_error, AppError::Archive(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let toml_error = toml::from_str::<serde_json::Value>("invalid = [toml").unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_invalid_url_is_an_http_error() {
        let client = reqwest::Client::new();
        match client.get("not a valid url").build() {
            Err(reqwest_error) => {
                let app_error: AppError = reqwest_error.into();
                assert!(matches!(app_error, AppError::Http(_)));
            }
            Ok(_) => panic!("Expected an error from invalid URL"),
        }
    }
}
