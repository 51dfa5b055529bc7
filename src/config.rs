use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Store API configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub country_code: Option<String>,
    pub request_timeout_secs: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub log_level: String,
    pub report_limit: i64,
    pub recent_limit: i64,
}

/// Read and parse an environment variable. Unset falls back to `default`.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, String> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {}: {:?}", name, raw)),
    }
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://steamwatch.db".to_string());

        let max_connections = parse_env::<u32>("DATABASE_MAX_CONNECTIONS", 1)?;

        let acquire_timeout_secs = parse_env::<u64>("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?;

        if max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
        })
    }

    /// Config for a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 5,
        }
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://steamwatch.db".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Create store API config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("STEAMWATCH_STORE_URL")
            .unwrap_or_else(|_| "https://store.steampowered.com/api".to_string());

        let country_code = env::var("STEAMWATCH_COUNTRY_CODE")
            .ok()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let request_timeout_secs = parse_env::<u64>("STEAMWATCH_REQUEST_TIMEOUT_SECS", 30)?;

        if request_timeout_secs == 0 {
            return Err("STEAMWATCH_REQUEST_TIMEOUT_SECS must be greater than 0".to_string());
        }

        if let Some(cc) = &country_code {
            if cc.len() != 2 || !cc.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!(
                    "Invalid STEAMWATCH_COUNTRY_CODE: {}. Must be a two letter country code",
                    cc
                ));
            }
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code,
            request_timeout_secs,
        })
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://store.steampowered.com/api".to_string(),
            country_code: None,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let store = StoreConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let report_limit = parse_env::<i64>("STEAMWATCH_REPORT_LIMIT", 5)?;

        let recent_limit = parse_env::<i64>("STEAMWATCH_RECENT_LIMIT", 20)?;

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        if report_limit <= 0 || recent_limit <= 0 {
            return Err(
                "STEAMWATCH_REPORT_LIMIT and STEAMWATCH_RECENT_LIMIT must be greater than 0"
                    .to_string(),
            );
        }

        Ok(Self {
            database,
            store,
            log_level: log_level.to_lowercase(),
            report_limit,
            recent_limit,
        })
    }

    /// Get database URL (convenience method)
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            store: StoreConfig::default(),
            log_level: "warn".to_string(),
            report_limit: 5,
            recent_limit: 20,
        }
    }
}
