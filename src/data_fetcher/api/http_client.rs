//! HTTP client creation and configuration utilities

use reqwest::Client;
use std::time::Duration;

use crate::config::Config;

/// Creates an HTTP client with connection pooling, a request timeout and a
/// User-Agent. The public API rejects requests without a User-Agent.
///
/// # Returns
/// * `Result<Client, reqwest::Error>` - A configured reqwest HTTP client or error
///
/// # Features
/// * Configurable timeout for requests (default: 30 seconds, configurable via config/env)
/// * Connection pooling with centralized pool size configuration
/// * Retries for transient failures happen in the fetch function, not here
pub fn create_http_client_with_timeout(
    timeout_seconds: u64,
    user_agent: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(user_agent)
        .build()
}

/// Creates the client described by the configuration.
pub fn create_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    create_http_client_with_timeout(config.http_timeout_seconds, &config.user_agent)
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(
        crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS,
        crate::constants::DEFAULT_USER_AGENT,
    )
    .expect("Failed to create test HTTP client")
}
