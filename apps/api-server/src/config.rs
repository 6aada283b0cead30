//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use blog_infra::{JwtConfig, RateLimitConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON file for posts; in-memory only when unset.
    pub posts_file: Option<PathBuf>,
    /// JSON file for user accounts; in-memory only when unset.
    pub users_file: Option<PathBuf>,
    /// Whether post and comment writes need a bearer token.
    pub require_auth: bool,
    pub rate_limit_enabled: bool,
    pub rate_limit: RateLimitConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5002),
            posts_file: path_var("POSTS_FILE"),
            users_file: path_var("USERS_FILE"),
            require_auth: parse_flag(env::var("REQUIRE_AUTH").ok().as_deref(), true),
            rate_limit_enabled: parse_flag(env::var("RATE_LIMIT_ENABLED").ok().as_deref(), true),
            rate_limit: RateLimitConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Boolean switch: `false`, `0`, `no` and `off` disable, anything else enables.
fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) => !matches!(v.as_str(), "false" | "0" | "no" | "off"),
    }
}
