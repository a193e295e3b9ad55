// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! down explicitly; nothing reads the environment after boot.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SUMANIZE_JWT_SECRET` | Session token signing secret | Required |
//! | `SESSION_TTL_DAYS` | Session lifetime in days | `7` |
//! | `SUMMARIZER_URL` | Generative-AI summarizer endpoint | Required |
//! | `AUTH_TOKEN_URL` | Identity provider code-exchange endpoint | Required |
//! | `DAILY_SUMMARY_QUOTA` | Summaries per user per day | `25` |
//! | `DEV_MODE` | `1`/`true` disables the `Secure` cookie attribute | off |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0}: {1}")]
    Invalid(&'static str, String),
}

/// Process configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Signing secret for session tokens. Injected here and handed to the
    /// token codec's constructor; never a mutable global.
    pub jwt_secret: String,
    pub session_ttl: Duration,
    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    pub summarizer_url: Url,
    pub provider_token_url: Url,
    /// Summaries each user may produce per day.
    pub daily_quota: u32,
    pub log_json: bool,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn required_url(name: &'static str) -> Result<Url, ConfigError> {
    required(name)?
        .parse()
        .map_err(|err: url::ParseError| ConfigError::Invalid(name, err.to_string()))
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 8080,
        };

        let jwt_secret = required("SUMANIZE_JWT_SECRET")?;

        let session_ttl_days: u64 = match std::env::var("SESSION_TTL_DAYS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SESSION_TTL_DAYS", raw))?,
            Err(_) => 7,
        };

        let daily_quota: u32 = match std::env::var("DAILY_SUMMARY_QUOTA") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("DAILY_SUMMARY_QUOTA", raw))?,
            Err(_) => 25,
        };

        let dev_mode = matches!(
            std::env::var("DEV_MODE").as_deref(),
            Ok("1") | Ok("true")
        );

        let log_json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

        Ok(Self {
            host,
            port,
            jwt_secret,
            session_ttl: Duration::from_secs(session_ttl_days * 24 * 60 * 60),
            secure_cookies: !dev_mode,
            summarizer_url: required_url("SUMMARIZER_URL")?,
            provider_token_url: required_url("AUTH_TOKEN_URL")?,
            daily_quota,
            log_json,
        })
    }
}

#[cfg(test)]
impl AppConfig {
    /// Fixed configuration for unit tests. No environment involved.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret-key-for-sessions".to_string(),
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            secure_cookies: false,
            summarizer_url: "http://localhost:9/summarize".parse().unwrap(),
            provider_token_url: "http://localhost:9/oauth/token".parse().unwrap(),
            daily_quota: 25,
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_has_a_week_long_session() {
        let config = AppConfig::for_tests();
        assert_eq!(config.session_ttl, Duration::from_secs(7 * 24 * 60 * 60));
        assert!(!config.secure_cookies);
    }
}
