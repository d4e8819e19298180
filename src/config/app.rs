use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Access tokens may live at most as long as refresh tokens (30 days)
const MAX_JWT_EXPIRES_IN_MINUTES: i64 = 30 * 24 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in_minutes: i64,
    pub seed_demo_data: bool,
    pub login_rate_limit: usize,
    pub login_rate_window_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_expires_in_minutes: 60,
            seed_demo_data: false,
            login_rate_limit: 10,
            login_rate_window_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if environment == "production" => bail!("JWT_SECRET must be set in production"),
            _ => defaults.jwt_secret,
        };

        let jwt_expires_in_minutes =
            parse_or(&lookup, "JWT_EXPIRES_IN_MINUTES", defaults.jwt_expires_in_minutes)?;
        if !(1..=MAX_JWT_EXPIRES_IN_MINUTES).contains(&jwt_expires_in_minutes) {
            bail!("JWT_EXPIRES_IN_MINUTES must be between 1 and {MAX_JWT_EXPIRES_IN_MINUTES}");
        }

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            environment,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            jwt_secret,
            jwt_expires_in_minutes,
            seed_demo_data: parse_or(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data)?,
            login_rate_limit: parse_or(&lookup, "LOGIN_RATE_LIMIT", defaults.login_rate_limit)?,
            login_rate_window_secs: parse_or(&lookup, "LOGIN_RATE_WINDOW_SECS", defaults.login_rate_window_secs)?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn access_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.jwt_expires_in_minutes)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub(crate) fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}
