/// Configuration management for UGC Service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// MongoDB configuration
    pub mongo: MongoConfig,
    /// Redis configuration (auth cache)
    pub redis: RedisConfig,
    /// Bearer token validation configuration
    pub auth: AuthConfig,
    /// UGC analytics log forwarding
    pub logs: LogsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origins: String,
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection string (mongodb://host:port)
    pub url: String,
    /// Database holding the UGC collections
    pub db_name: String,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL (redis://host:port)
    pub url: String,
}

/// Bearer token validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// External auth service validation endpoint
    pub url: Option<String>,
    /// Whether tokens are validated against the auth service.
    /// When false only the local claims decode runs (dev mode).
    pub validate: bool,
    /// Cache expiry for validation results, clamped per token to its
    /// remaining lifetime
    pub cache_expire_secs: u64,
}

/// UGC analytics log forwarding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Analytics API base URL; forwarding is disabled when unset
    pub url: Option<String>,
}

fn default_cache_expire_secs() -> u64 {
    600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        };

        let mongo = MongoConfig {
            url: std::env::var("MONGO_URL")
                .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string()),
            db_name: std::env::var("MONGO_DB_NAME").unwrap_or_else(|_| "ugc".to_string()),
        };

        let redis = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        };

        let validate = std::env::var("JWT_VALIDATE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let auth_url = match std::env::var("AUTH_URL") {
            Ok(url) => Some(url),
            Err(_) if validate => {
                return Err(anyhow::anyhow!("AUTH_URL environment variable not set"))
                    .context("AUTH_URL is required unless JWT_VALIDATE=false");
            }
            Err(_) => None,
        };

        let auth = AuthConfig {
            url: auth_url,
            validate,
            cache_expire_secs: std::env::var("AUTH_CACHE_EXPIRE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_cache_expire_secs),
        };

        let logs = LogsConfig {
            url: std::env::var("UGC_LOGS_URL").ok(),
        };

        Ok(Config {
            app,
            mongo,
            redis,
            auth,
            logs,
        })
    }
}
