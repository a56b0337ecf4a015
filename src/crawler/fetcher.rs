//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvesters, including:
//! - Building HTTP clients with proper user agent strings
//! - Classifying responses into typed failures
//! - Retry logic for transient failures and rate limits
//! - The politeness delay between successive requests

use crate::config::{FetcherConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Typed failure of a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Rate limited (HTTP 429) by {url}")]
    RateLimited { url: String },

    #[error("HTTP {status} for {url}")]
    HttpError { url: String, status: u16 },

    #[error("Not found (HTTP 404): {url}")]
    NotFound { url: String },

    #[error("Network error for {url}: {message}")]
    NetworkError { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::RateLimited { url }
            | Self::HttpError { url, .. }
            | Self::NotFound { url }
            | Self::NetworkError { url, .. } => url,
        }
    }

    /// Returns true if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::NetworkError { .. } => true,
            Self::HttpError { status, .. } => *status >= 500,
            Self::NotFound { .. } => false,
        }
    }
}

/// Maps a response status to a fetch failure, if it is one
pub fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound {
            url: url.to_string(),
        });
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(FetchError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(())
}

/// Classifies a transport-level reqwest error
pub fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = error.status() {
        FetchError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Retry and politeness timings
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 429 | Wait `rate_limit_cooldown`, retry |
/// | Timeout / network error | Wait `retry_delay`, retry |
/// | HTTP 5xx | Wait `retry_delay * 2^attempt` (capped), retry |
/// | HTTP 404 / other 4xx | Give up immediately |
///
/// Every retry counts against `max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub rate_limit_cooldown: Duration,
    pub politeness_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            rate_limit_cooldown: Duration::from_millis(config.rate_limit_cooldown_ms),
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
        }
    }

    /// How long to wait before retry number `attempt + 1`, or None to give up
    pub fn delay_for(&self, error: &FetchError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }

        match error {
            FetchError::RateLimited { .. } => Some(self.rate_limit_cooldown),
            FetchError::Timeout { .. } | FetchError::NetworkError { .. } => Some(self.retry_delay),
            FetchError::HttpError { status, .. } if *status >= 500 => {
                let factor = 2u32.saturating_pow(attempt.min(16));
                let backoff = self.retry_delay.saturating_mul(factor);
                Some(backoff.min(self.rate_limit_cooldown.max(self.retry_delay)))
            }
            _ => None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use anime_harvest::config::{FetcherConfig, UserAgentConfig};
/// use anime_harvest::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "AnimeHarvest".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP GET with retries and a politeness delay
///
/// Requests through one `Fetcher` are serialized: each request waits until
/// `politeness_delay` has passed since the previous successful one. Retry
/// sleeps do not hold the request slot.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    last_success: Mutex<Option<Instant>>,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            last_success: Mutex::new(None),
        }
    }

    /// Builds the client and retry policy from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, fetcher)?;
        Ok(Self::new(client, RetryPolicy::from_config(fetcher)))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` and returns the response body
    ///
    /// Transient failures are retried according to the [`RetryPolicy`]; the
    /// last failure is returned once the retry cap is reached.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            let error = match self.polite_get(url).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            match self.policy.delay_for(&error, attempt) {
                Some(delay) => {
                    attempt += 1;
                    tracing::warn!(
                        "{} (retry {}/{} in {:?})",
                        error,
                        attempt,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    if attempt > 0 {
                        tracing::error!("Giving up on {} after {} retries: {}", url, attempt, error);
                    }
                    return Err(error);
                }
            }
        }
    }

    async fn polite_get(&self, url: &str) -> Result<String, FetchError> {
        let mut last_success = self.last_success.lock().await;

        if let Some(last) = *last_success {
            let elapsed = last.elapsed();
            if elapsed < self.policy.politeness_delay {
                tokio::time::sleep(self.policy.politeness_delay - elapsed).await;
            }
        }

        let result = self.get_once(url).await;
        if result.is_ok() {
            *last_success = Some(Instant::now());
        }
        result
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        check_status(url, response.status())?;

        response.text().await.map_err(|e| classify_error(url, &e))
    }
}
