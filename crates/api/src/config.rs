//! Server configuration, read once at startup.
//!
//! | Variable | Default | Purpose |
//! |----------------------------|-----------|--------------------------------------|
//! | `HOST` | `0.0.0.0` | Bind address |
//! | `PORT` | `8080` | Bind port |
//! | `DATABASE_URL` | required | Postgres connection string |
//! | `DATABASE_MAX_CONNECTIONS` | `10` | Pool size |
//! | `JWT_SECRET` | required | HS256 key shared with the identity provider |
//! | `CORS_ORIGINS` | `http://localhost:5173` | Comma-separated allowed origins |
//! | `REQUEST_TIMEOUT_SECS` | `30` | Per-request deadline |
//! | `SHUTDOWN_GRACE_SECS` | `20` | Wait for in-flight work on shutdown |
//!
//! Sweep intervals are read by the background module, SMTP settings by
//! the events crate and media settings by the storage module.

use crate::auth::jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<ServerConfig, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        Ok(ServerConfig {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080)?,
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_grace_secs: parse_or("SHUTDOWN_GRACE_SECS", 20)?,
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}
