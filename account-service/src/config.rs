use anyhow::{anyhow, Context, Result};
use std::env;

use common_auth::config::{DEFAULT_ACCESS_TTL_SECONDS, DEFAULT_REFRESH_TTL_SECONDS};
use common_auth::TokenConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: TokenConfig,
    pub redis_url: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

pub fn load_config() -> Result<AppConfig> {
    let access_key = require_env("ACCESS_TOKEN_KEY")?;
    let refresh_key = require_env("REFRESH_TOKEN_KEY")?;

    let access_ttl = i64_from_env("ACCESS_TOKEN_TTL_SECONDS")?
        .unwrap_or(DEFAULT_ACCESS_TTL_SECONDS);
    let refresh_ttl = i64_from_env("REFRESH_TOKEN_TTL_SECONDS")?
        .unwrap_or(DEFAULT_REFRESH_TTL_SECONDS);
    if access_ttl <= 0 || refresh_ttl <= 0 {
        return Err(anyhow!("Token TTLs must be positive"));
    }

    let token = TokenConfig::new(access_key, refresh_key).with_ttls(access_ttl, refresh_ttl);

    let redis_url =
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let database_url = require_env("DATABASE_URL")?;

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = u16_from_env("PORT")?.unwrap_or(8080);

    Ok(AppConfig {
        token,
        redis_url,
        database_url,
        host,
        port,
    })
}

fn require_env(key: &str) -> Result<String> {
    let value = env::var(key).map_err(|_| anyhow!("{key} must be set"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn i64_from_env(key: &str) -> Result<Option<i64>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .with_context(|| format!("Failed to parse {key}")),
        Err(_) => Ok(None),
    }
}

fn u16_from_env(key: &str) -> Result<Option<u16>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map(Some)
            .with_context(|| format!("Failed to parse {key}")),
        Err(_) => Ok(None),
    }
}
