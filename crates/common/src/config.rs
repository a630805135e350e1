//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Feed assembly limits.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Size of the "authors/works to follow" panels.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u64,
    /// Posts per page when the client does not ask for a limit.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for a client-provided limit.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl FeedConfig {
    /// Resolve a client-provided page size against the configured bounds.
    #[must_use]
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }

    /// Reject page bounds that cannot produce a page.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.max_page_size == 0 {
            return Err(config::ConfigError::Message(
                "feed.max_page_size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(config::ConfigError::Message(format!(
                "feed.default_page_size ({}) exceeds feed.max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_suggestion_limit() -> u64 {
    6
}

const fn default_page_size() -> u64 {
    50
}

const fn default_max_page_size() -> u64 {
    100
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FANDOOM_ENV`)
    /// 3. Environment variables with `FANDOOM__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();

        let env = std::env::var("FANDOOM_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FANDOOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.feed.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FANDOOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.feed.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_defaults() {
        let feed = FeedConfig::default();
        assert_eq!(feed.suggestion_limit, 6);
        assert_eq!(feed.default_page_size, 50);
        assert_eq!(feed.max_page_size, 100);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let feed = FeedConfig::default();
        assert_eq!(feed.page_size(None), 50);
        assert_eq!(feed.page_size(Some(10)), 10);
        assert_eq!(feed.page_size(Some(0)), 1);
        assert_eq!(feed.page_size(Some(5000)), 100);
    }

    #[test]
    fn test_page_size_with_zero_bound() {
        let feed = FeedConfig {
            max_page_size: 0,
            ..FeedConfig::default()
        };
        assert_eq!(feed.page_size(None), 1);
        assert_eq!(feed.page_size(Some(20)), 1);
    }

    #[test]
    fn test_validate_page_bounds() {
        assert!(FeedConfig::default().validate().is_ok());

        let zero = FeedConfig {
            max_page_size: 0,
            ..FeedConfig::default()
        };
        assert!(zero.validate().is_err());

        let inverted = FeedConfig {
            default_page_size: 200,
            max_page_size: 100,
            ..FeedConfig::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "server": { "url": "http://localhost:8000" },
            "database": { "url": "postgres://localhost/fandoom" }
        }))
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.feed.suggestion_limit, 6);
    }
}
