/// Configuration management for Civic Service
///
/// Loads configuration from environment variables.
use actix_middleware::RateLimitConfig;
use anyhow::{Context, Result};
use file_lock::LockOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Where the JSON record files live
    pub storage: StorageConfig,
    /// Lock timing shared by every record file
    pub lock: LockConfig,
    /// Bearer token verification
    pub auth: AuthConfig,
    /// Remote news API
    pub news: NewsConfig,
    /// Per-client request limits
    pub rate_limit: RateLimitSettings,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Comma-separated allowed origins; `None` allows any origin
    pub cors_allowed_origins: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Lock timing, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    pub timeout_ms: u64,
    pub stale_ms: u64,
    pub retry_interval_ms: u64,
}

impl LockConfig {
    pub fn options(&self) -> LockOptions {
        LockOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            stale_after: Duration::from_millis(self.stale_ms),
            retry_interval: Duration::from_millis(self.retry_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 shared secret
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    pub api_url: String,
    /// Without a key the remote fetch is skipped and the fallback article served
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl RateLimitSettings {
    pub fn middleware_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.max_requests,
            window_seconds: self.window_seconds,
        }
    }
}

// Default values
fn default_lock_timeout_ms() -> u64 {
    5_000
}

fn default_lock_stale_ms() -> u64 {
    10_000
}

fn default_lock_retry_interval_ms() -> u64 {
    100
}

fn default_news_api_url() -> String {
    "https://newsapi.org/v2/top-headlines".to_string()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env_parse("PORT").unwrap_or(3000),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        let storage = StorageConfig {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
        };

        let lock = LockConfig {
            timeout_ms: env_parse("LIKE_LOCK_TIMEOUT_MS").unwrap_or_else(default_lock_timeout_ms),
            stale_ms: env_parse("LIKE_LOCK_STALE_MS").unwrap_or_else(default_lock_stale_ms),
            retry_interval_ms: env_parse("LOCK_RETRY_INTERVAL_MS")
                .unwrap_or_else(default_lock_retry_interval_ms),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
        };

        let news = NewsConfig {
            api_url: std::env::var("NEWS_API_URL").unwrap_or_else(|_| default_news_api_url()),
            api_key: std::env::var("NEWS_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            timeout_ms: env_parse("NEWS_API_TIMEOUT_MS").unwrap_or(5_000),
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitSettings {
            max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS").unwrap_or(defaults.max_requests),
            window_seconds: env_parse("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or(defaults.window_seconds),
        };

        Ok(Config {
            app,
            storage,
            lock,
            auth,
            news,
            rate_limit,
        })
    }

    /// Configuration rooted at `data_dir`, used by tests and tooling.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        let defaults = RateLimitConfig::default();
        Config {
            app: AppConfig {
                env: "test".to_string(),
                host: "127.0.0.1".to_string(),
                http_port: 0,
                cors_allowed_origins: None,
            },
            storage: StorageConfig {
                data_dir: data_dir.into(),
            },
            lock: LockConfig {
                timeout_ms: default_lock_timeout_ms(),
                stale_ms: default_lock_stale_ms(),
                retry_interval_ms: default_lock_retry_interval_ms(),
            },
            auth: AuthConfig {
                jwt_secret: jwt_secret.into(),
            },
            news: NewsConfig {
                api_url: default_news_api_url(),
                api_key: None,
                timeout_ms: 5_000,
            },
            rate_limit: RateLimitSettings {
                max_requests: defaults.max_requests,
                window_seconds: defaults.window_seconds,
            },
        }
    }
}
