//! HTTP client for the DLP content API.
//!
//! # Features
//!
//! - **Deidentify/Reidentify**: the two content transformation calls the
//!   adapter consumes, and nothing else of the service surface
//! - **Opt-in Retries**: exponential backoff for transient transport
//!   failures, disabled unless the configuration enables it
//! - **Secure Credentials**: uses the `secrecy` crate to prevent
//!   accidental exposure of the bearer token
//!
//! # Credentials
//!
//! Construction requires either an explicit auth token in the
//! [`Config`] or the `GOOGLE_APPLICATION_CREDENTIALS` environment
//! variable naming a service-account credential file. The credential
//! file's content is never read here; ambient credential exchange is the
//! environment's responsibility, and this client only refuses to start
//! without any credential source at all.
//!
//! # Error Handling
//!
//! - **Authentication errors (401/403)**: missing or underprivileged
//!   credentials
//! - **Rate limiting (429)**: quota exhausted, honors `Retry-After` when
//!   retries are enabled
//! - **Server errors (5xx)**: transient service failures
//! - **Malformed responses**: missing or undecodable response data

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_retry_after::RetryAfterMiddleware;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tokenveil_common::Config;

use crate::DlpService;
use crate::dlp::{ContentResponse, DeidentifyRequest, ReidentifyRequest};
use crate::error::{DlpError, ErrorResponse};

/// Production endpoint of the DLP content API.
pub const DEFAULT_BASE_URL: &str = "https://dlp.googleapis.com";

/// Environment variable naming the service-account credential file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Client for the DLP content transformation API.
///
/// Cheaply cloneable and safe to share across tasks: every call is an
/// independent, stateless request/response exchange.
///
/// # Security
///
/// The bearer token is stored using the `secrecy` crate to prevent
/// accidental exposure through debug logs or memory dumps.
#[derive(Clone)]
pub struct DlpHttpClient {
    client: ClientWithMiddleware,
    auth_token: Option<Arc<SecretString>>,
    base_url: String,
    config: Arc<Config>,
}

// Custom Debug implementation to avoid exposing the bearer token
impl std::fmt::Debug for DlpHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DlpHttpClient")
            .field("auth_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DlpHttpClient {
    /// Create a new DLP client from a configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tokenveil_client::DlpHttpClient;
    /// use tokenveil_common::Config;
    ///
    /// let config = Config::new()
    ///     .with_auth_token("ya29.token")
    ///     .with_timeout_seconds(20);
    ///
    /// let client = DlpHttpClient::new(config)?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if no credential source is available or HTTP
    /// client creation fails.
    pub fn new(config: Config) -> Result<Self> {
        let auth_token = config.auth_token.clone().map(Arc::new);

        // Without an explicit token, a service-account credential file
        // must at least be named in the environment before construction.
        if auth_token.is_none()
            && !std::env::var(CREDENTIALS_ENV).is_ok_and(|path| !path.is_empty())
        {
            return Err(DlpError::Configuration(format!(
                "no auth token configured and {CREDENTIALS_ENV} is not set"
            ))
            .into());
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Build retry policy from config
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(
                config.retry_config.initial_delay,
                config.retry_config.max_delay,
            )
            .build_with_max_retries(config.retry_config.max_retries);

        // Create reqwest client with timeout configuration
        // None means no client-side timeout
        let reqwest_client = match config.timeout_seconds {
            Some(timeout) => reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout))
                .build()?,
            None => reqwest::Client::builder().build()?,
        };

        // NOTE: RetryAfterMiddleware must come before RetryTransientMiddleware
        // so Retry-After headers are respected before exponential backoff
        let client = reqwest_middleware::ClientBuilder::new(reqwest_client)
            .with(RetryAfterMiddleware::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            auth_token,
            base_url,
            config: Arc::new(config),
        })
    }

    /// The configuration this client was constructed with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set a custom base URL for the API endpoint.
    ///
    /// Useful for regional endpoints, test servers, or proxies.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Arc::make_mut(&mut self.config).base_url = Some(base_url.clone());
        self.base_url = base_url;
        self
    }

    async fn post_content<T: for<'de> Deserialize<'de>, B: Serialize + Sync>(
        &self,
        parent: &str,
        verb: &str,
        body: &B,
    ) -> Result<T, DlpError> {
        let url = format!("{}/v2/{}/content:{}", self.base_url, parent, verb);

        // Validate URL construction
        url::Url::parse(&url)
            .map_err(|e| DlpError::Configuration(format!("Invalid URL '{url}': {e}")))?;

        let mut request_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(token) = &self.auth_token {
            request_builder = request_builder
                .header("Authorization", format!("Bearer {}", token.expose_secret()));
        }

        let response = request_builder
            .body(serde_json::to_string(body).map_err(DlpError::Serialization)?)
            .send()
            .await
            .map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(inner) if inner.is_timeout() => {
                    DlpError::Timeout
                }
                other => DlpError::Middleware(other),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.map_err(|e| {
                warn!("Failed to read error response body: {e}");
                DlpError::Network(e)
            })?;

            // Extract the error message from structured response or use raw text
            let error_message = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(parsed) => {
                    debug!("Parsed structured error response");
                    parsed.error.message
                }
                Err(parse_err) => {
                    debug!(
                        "Failed to parse error response as JSON: {parse_err}. Using raw text instead."
                    );
                    error_text
                }
            };

            error!(
                "content:{verb} failed with status {}: {}",
                status.as_u16(),
                error_message
            );

            return Err(match status.as_u16() {
                401 | 403 => DlpError::Authentication(error_message),
                429 => DlpError::RateLimit { retry_after: None },
                _ => DlpError::Service(error_message),
            });
        }

        let response_text = response.text().await?;
        debug!("Raw content:{verb} response: {response_text}");
        let parsed_response: T =
            serde_json::from_str(&response_text).map_err(DlpError::Serialization)?;

        Ok(parsed_response)
    }
}

#[async_trait]
impl DlpService for DlpHttpClient {
    async fn deidentify(&self, request: &DeidentifyRequest) -> Result<ContentResponse> {
        let response = self
            .post_content(&request.parent, "deidentify", request)
            .await?;
        Ok(response)
    }

    async fn reidentify(&self, request: &ReidentifyRequest) -> Result<ContentResponse> {
        let response = self
            .post_content(&request.parent, "reidentify", request)
            .await?;
        Ok(response)
    }
}
