use std::net::SocketAddr;
use std::time::Duration;

use crate::client::SourceUrls;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub urls: SourceUrls,
    pub bind_addr: SocketAddr,
    pub cache_ttl_secs: u64,
    pub log_level: String,
    pub user_agent: String,
    /// Outbound request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load settings from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };
        let or_default =
            |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());
        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };

        let urls = SourceUrls {
            upcoming: require("DATABRUS_UPCOMING_URL")?,
            previous: require("DATABRUS_PREVIOUS_URL")?,
            table: require("DATABRUS_TABLE_URL")?,
        };

        let bind_addr = or_default("DATABRUS_BIND_ADDR", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .map_err(|e| invalid("DATABRUS_BIND_ADDR", e.to_string()))?;

        let cache_ttl_secs = or_default("DATABRUS_CACHE_TTL_SECS", "1800")
            .parse::<u64>()
            .map_err(|e| invalid("DATABRUS_CACHE_TTL_SECS", e.to_string()))?;

        let request_timeout = lookup("DATABRUS_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| invalid("DATABRUS_REQUEST_TIMEOUT_SECS", e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            urls,
            bind_addr,
            cache_ttl_secs,
            log_level: or_default("DATABRUS_LOG_LEVEL", "info"),
            user_agent: or_default(
                "DATABRUS_USER_AGENT",
                concat!("databrus-scraper/", env!("CARGO_PKG_VERSION")),
            ),
            request_timeout,
        })
    }

    /// The outbound HTTP client described by these settings.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
