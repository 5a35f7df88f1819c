//! HTTP client shared foundation
//!
//! Wraps reqwest with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Status mapping: 404 -> PackageNotFound, 429 -> RateLimitExceeded

use crate::error::RegistryError;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depsync/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request and parse the JSON response, retrying transient
    /// failures with exponential backoff
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, package).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| RegistryError::invalid_response(package, format!("bad JSON: {}", e)))
    }

    /// Perform a GET request with retry logic
    async fn get(&self, url: &str, package: &str) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::RateLimitExceeded {
                            package: package.to_string(),
                        });

                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(RegistryError::package_not_found(package));
                    }

                    if !response.status().is_success() {
                        return Err(RegistryError::network_error(
                            package,
                            format!("HTTP {}", response.status()),
                        ));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        RegistryError::Timeout {
                            package: package.to_string(),
                        }
                    } else {
                        RegistryError::network_error(package, e.to_string())
                    });

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RegistryError::network_error(package, "unknown error".to_string())))
    }
}
