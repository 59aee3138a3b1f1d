//! Configuration management for the floodgate client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FloodgateError, Result};

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const API_KEY_ENV: &str = "FLOODGATE_API_KEY";

/// Main configuration for a floodgate client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Base URL template; `{region}` is replaced with the location identifier
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the header carrying the API key
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Per-request time budget in seconds; unset waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Rate limit budgets
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            auth_header: default_auth_header(),
            request_timeout_secs: None,
            throttle: ThrottleConfig::default(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig =
            serde_yaml::from_str(&contents).map_err(|e| FloodgateError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Build a configuration with the API key taken from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| FloodgateError::Config(format!("{API_KEY_ENV} is not set")))?;
        Ok(Self::new(key))
    }

    /// Per-request time budget as a duration.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn default_base_url() -> String {
    "https://{region}.api.riotgames.com/lol".to_string()
}

fn default_auth_header() -> String {
    "X-Riot-Token".to_string()
}

/// Rate limit budgets applied by every location's limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Application-scope budgets, all enforced simultaneously
    #[serde(default = "default_app_limits")]
    pub app_limits: Vec<WindowLimit>,

    /// Budgets applied to each method the first time it is seen
    #[serde(default = "default_method_limits")]
    pub method_limits: Vec<WindowLimit>,

    /// Safety margin in milliseconds added to every computed wait
    #[serde(default = "default_safety_margin_ms")]
    pub safety_margin_ms: u64,

    /// Cap on server-forced retries per call; unset retries indefinitely
    #[serde(default)]
    pub max_forced_retries: Option<u32>,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            app_limits: default_app_limits(),
            method_limits: default_method_limits(),
            safety_margin_ms: default_safety_margin_ms(),
            max_forced_retries: None,
        }
    }
}

impl ThrottleConfig {
    /// Safety margin as a duration.
    pub fn safety_margin(&self) -> Duration {
        Duration::from_millis(self.safety_margin_ms)
    }

    /// Reject budgets a limiter cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.app_limits.is_empty() {
            return Err(FloodgateError::Config(
                "at least one application-scope budget is required".to_string(),
            ));
        }
        if self.safety_margin_ms == 0 {
            return Err(FloodgateError::Config(
                "safety margin must be positive".to_string(),
            ));
        }
        for limit in self.app_limits.iter().chain(self.method_limits.iter()) {
            if limit.limit == 0 || limit.window_secs == 0 {
                return Err(FloodgateError::Config(format!(
                    "budget {}/{}s must have a positive limit and window",
                    limit.limit, limit.window_secs
                )));
            }
        }
        Ok(())
    }
}

fn default_app_limits() -> Vec<WindowLimit> {
    vec![WindowLimit::new(20, 1), WindowLimit::new(100, 120)]
}

fn default_method_limits() -> Vec<WindowLimit> {
    vec![WindowLimit::new(50, 10)]
}

fn default_safety_margin_ms() -> u64 {
    500
}

/// One "at most `limit` requests per `window_secs`" budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLimit {
    /// Maximum requests allowed inside the window
    pub limit: usize,
    /// Window length in whole seconds
    pub window_secs: u64,
}

impl WindowLimit {
    /// Create a budget.
    pub fn new(limit: usize, window_secs: u64) -> Self {
        Self { limit, window_secs }
    }

    /// Window length as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
