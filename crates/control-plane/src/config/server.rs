// Server configuration
// Decision: DATABASE_URL is optional; without it the server runs on in-memory storage

use axum::http::HeaderValue;
use taskdeck_core::DEFAULT_LIST_LIMIT;

use super::env_opt;

/// HTTP server and storage settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (HTTP_ADDR)
    pub http_addr: String,
    /// Prefix for all API routes (API_PREFIX), e.g. "/api"
    pub api_prefix: String,
    /// Allowed CORS origins (CORS_ALLOWED_ORIGINS, comma separated)
    pub cors_origins: Vec<HeaderValue>,
    /// Postgres connection string; None selects in-memory storage
    pub database_url: Option<String>,
    /// Page size when a list request has no `limit`
    pub default_list_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:4000".to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            database_url: None,
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_addr: env_opt("HTTP_ADDR").unwrap_or(defaults.http_addr),
            api_prefix: env_opt("API_PREFIX").unwrap_or_default(),
            cors_origins: env_opt("CORS_ALLOWED_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
            database_url: env_opt("DATABASE_URL"),
            default_list_limit: env_opt("NOTIFICATIONS_DEFAULT_LIMIT")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.default_list_limit),
        }
    }
}

fn parse_origins(value: &str) -> Vec<HeaderValue> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
