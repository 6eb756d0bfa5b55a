//! Client configuration.

use std::time::Duration;

use memgame_tick::TimerConfig;

/// Backend the client talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://192.168.1.70:80/api";
/// Per-request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_API_URL: &str = "MEMGAME_API_URL";
/// Environment variable overriding [`ClientConfig::timeout`], in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MEMGAME_TIMEOUT_SECS";

/// Everything needed to build a [`MemgameClient`](crate::MemgameClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend API root; endpoint paths are appended to it.
    pub base_url: String,
    pub timeout: Duration,
    pub timer: TimerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            timer: TimerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `MEMGAME_API_URL` and `MEMGAME_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through
    /// `lookup`.
    ///
    /// Blank values are ignored. A timeout that isn't a positive whole
    /// number of seconds is ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(ENV_API_URL) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    default_secs = DEFAULT_TIMEOUT.as_secs(),
                    "ignoring invalid {ENV_TIMEOUT_SECS}"
                ),
            }
        }
        config
    }
}
