use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for exponential backoff retry behavior.
///
/// This struct controls how failed requests are retried with increasing
/// delays between attempts. Retries are disabled by default: the DLP
/// exchange has no retry in its base behavior, and enabling one must be
/// an explicit caller decision. When enabled, retries only apply to
/// transport-level failures (connect errors, timeouts, 5xx) where the
/// request is safe to reissue.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tokenveil_common::config::RetryConfig;
///
/// // Opt in to three retries with doubling delays
/// let config = RetryConfig {
///     max_retries: 3,
///     initial_delay: Duration::from_millis(500),
///     max_delay: Duration::from_secs(30),
///     backoff_multiplier: 2.0,
///     jitter: true,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts before failing. Zero disables retries.
    pub max_retries: u32,
    /// Initial delay before the first retry attempt.
    pub initial_delay: Duration,
    /// Maximum delay between retry attempts (caps exponential growth).
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (typically 2.0 for doubling).
    pub backoff_multiplier: f64,
    /// Whether to add random jitter to retry delays to prevent thundering herd.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Configuration for a DLP service client.
///
/// Created once at process start, read-only after the client is
/// constructed. Key material and the target project travel with each
/// request rather than in this struct; the configuration covers the
/// transport concerns only.
///
/// # Credentials
///
/// The auth token is stored as a [`SecretString`] and is never
/// serialized. When no token is set, client construction requires the
/// `GOOGLE_APPLICATION_CREDENTIALS` environment variable to name a
/// service-account credential file; the credential content itself is
/// handled by the ambient environment, never by this crate.
///
/// # Examples
///
/// ```
/// use tokenveil_common::Config;
///
/// let config = Config::new()
///     .with_auth_token("ya29.token")
///     .with_timeout_seconds(20);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Optional custom base URL for API requests.
    ///
    /// Override this for test servers, regional endpoints, or proxies.
    pub base_url: Option<String>,
    /// OAuth bearer token for authentication (stored securely).
    ///
    /// Will not be serialized to prevent accidental exposure.
    #[serde(skip_serializing, default)]
    pub auth_token: Option<SecretString>,
    /// Request timeout in seconds.
    ///
    /// `None` means no client-side timeout.
    pub timeout_seconds: Option<u64>,
    /// Configuration for retry behavior with exponential backoff.
    #[serde(skip)]
    pub retry_config: RetryConfig,
}

impl Config {
    /// Creates a new configuration with all fields at their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL for API requests.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL for the API
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the OAuth bearer token for authentication.
    ///
    /// The token is stored securely using `SecretString`.
    ///
    /// # Arguments
    ///
    /// * `auth_token` - The bearer token
    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::new(auth_token.into().into()));
        self
    }

    /// Sets the request timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_seconds` - Timeout in seconds for each request
    #[must_use]
    pub const fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Sets the retry configuration.
    ///
    /// # Arguments
    ///
    /// * `retry_config` - The retry policy to apply to transport failures
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }
}
