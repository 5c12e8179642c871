//! Client configuration.

use std::time::Duration;

/// Default base URL of the Trustgate API.
pub const DEFAULT_API_URL: &str = "https://api.trustgate.io/";

/// Currently supported API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Base polling interval for a checkpoint, in milliseconds.
pub const BASE_CHECKPOINT_TIMEOUT_MS: u64 = 100;

/// Ceiling on the polling interval, in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 10_000;

/// Maximum number of submission attempts and tolerated polling failures.
pub const MAX_RETRY_COUNT: u32 = 3;

/// Configuration for the Trustgate client.
///
/// An explicit immutable value handed to [`Trustgate::new`]; it is never
/// shared or mutated across resolutions, so concurrent checkpoints on the
/// same client need no synchronization.
///
/// [`Trustgate::new`]: crate::Trustgate::new
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    pub api_url: String,
    /// API version path segment (e.g. `v1`).
    pub api_version: String,
    /// When `false`, every checkpoint short-circuits to an approved
    /// result without contacting the service.
    pub enabled: bool,
    /// Per-request timeout for any single HTTP exchange.
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_version: DEFAULT_API_VERSION.into(),
            enabled: true,
            http_timeout: Duration::from_secs(10),
        }
    }
}
