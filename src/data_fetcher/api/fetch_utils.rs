//! Generic HTTP fetching utilities with retry logic and error handling

use rand::Rng;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::retry::{BASE_DELAY_MS, JITTER_FRACTION, MAX_RETRIES};
use crate::error::AppError;

/// Sends a GET, retrying transient failures with exponential backoff.
///
/// What counts as transient is decided by [`AppError::is_retryable`]; the
/// wait is the server's `Retry-After` when present, otherwise the backoff
/// step with jitter. The final failure is returned as-is.
async fn send_with_retry(client: &Client, url: &str) -> Result<Response, AppError> {
    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(BASE_DELAY_MS);
    loop {
        let error = match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Response status: {}", resp.status());
                return Ok(resp);
            }
            Ok(resp) => {
                let retry_after = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                AppError::from_status(resp.status().as_u16(), url, retry_after)
            }
            Err(e) => AppError::from_transport(url, e),
        };

        if !error.is_retryable() || attempt >= MAX_RETRIES {
            // 404 is an ordinary answer for unknown players and empty months
            if error.is_not_found() {
                debug!("{error}");
            } else {
                error!("{error}");
            }
            return Err(error);
        }

        let wait = error.retry_after().unwrap_or_else(|| with_jitter(backoff));
        attempt += 1;
        warn!("{error}. Retrying in {wait:?} (attempt {attempt}/{MAX_RETRIES})");
        tokio::time::sleep(wait).await;
        backoff = backoff.saturating_mul(2);
    }
}

/// Fetches JSON from `url` and deserializes it.
///
/// Transport and status failures go through the shared retry loop. Bodies
/// that arrive but cannot be used are split into empty, not-JSON and
/// unexpected-shape errors.
#[instrument(skip(client))]
pub(crate) async fn fetch<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    info!("Fetching data from URL: {url}");
    let response = send_with_retry(client, url).await?;

    let response_text = response.text().await.map_err(|e| {
        error!("Failed to read response text from URL {}: {}", url, e);
        AppError::Http(e)
    })?;
    debug!("Response length: {} bytes", response_text.len());

    serde_json::from_str::<T>(&response_text).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);
        error!(
            "Response text (first 200 chars): {}",
            &response_text.chars().take(200).collect::<String>()
        );
        classify_parse_failure(&response_text, e, url)
    })
}

/// Fetches a binary body, e.g. a zipped registry download.
#[instrument(skip(client))]
pub(crate) async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, AppError> {
    info!("Downloading {url}");
    let response = send_with_retry(client, url).await?;
    let bytes = response.bytes().await?;
    debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

fn classify_parse_failure(body: &str, err: serde_json::Error, url: &str) -> AppError {
    let trimmed = body.trim_start();
    let url = url.to_string();
    if trimmed.is_empty() {
        AppError::ApiNoData { url }
    } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        AppError::ApiMalformedJson { url }
    } else {
        AppError::ApiUnexpectedStructure {
            message: err.to_string(),
            url,
        }
    }
}

/// Spreads retries of concurrent requests so they don't hit the API in lockstep
fn with_jitter(base: Duration) -> Duration {
    let factor = rand::rng().random_range(-JITTER_FRACTION..=JITTER_FRACTION);
    base.mul_f64(1.0 + factor)
}
