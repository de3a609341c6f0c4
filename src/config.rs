use chrono::Duration;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;
/// Ten years.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;
pub const MIN_HASH_WORK_FACTOR: u32 = 4;
pub const MAX_HASH_WORK_FACTOR: u32 = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid ({value:?}): {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Settings for token signing and password hashing.
///
/// Built once at startup and handed by reference to the components that need
/// it. Changing `signing_secret` invalidates every token issued before.
#[derive(Clone)]
pub struct AuthConfig {
    signing_secret: String,
    pub token_ttl: Duration,
    pub hash_work_factor: u32,
}

impl AuthConfig {
    pub fn new(
        signing_secret: impl Into<String>,
        token_ttl_seconds: i64,
        hash_work_factor: u32,
    ) -> Result<Self, ConfigError> {
        let signing_secret = signing_secret.into();
        if signing_secret.is_empty() {
            return Err(ConfigError::Missing("SIGNING_SECRET"));
        }
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&token_ttl_seconds) {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECONDS",
                value: token_ttl_seconds.to_string(),
                reason: "must be between 1 second and 10 years",
            });
        }
        if !(MIN_HASH_WORK_FACTOR..=MAX_HASH_WORK_FACTOR).contains(&hash_work_factor) {
            return Err(ConfigError::Invalid {
                key: "HASH_WORK_FACTOR",
                value: hash_work_factor.to_string(),
                reason: "bcrypt cost must be between 4 and 31",
            });
        }

        Ok(Self {
            signing_secret,
            token_ttl: Duration::seconds(token_ttl_seconds),
            hash_work_factor,
        })
    }

    pub fn signing_secret(&self) -> &[u8] {
        self.signing_secret.as_bytes()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_work_factor", &self.hash_work_factor)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Falls back to the in-memory user store when unset.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_secret = lookup("SIGNING_SECRET").ok_or(ConfigError::Missing("SIGNING_SECRET"))?;
        let token_ttl_seconds = parse_or(&lookup, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        let hash_work_factor = parse_or(&lookup, "HASH_WORK_FACTOR", bcrypt::DEFAULT_COST)?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            auth: AuthConfig::new(signing_secret, token_ttl_seconds, hash_work_factor)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be a number",
        }),
    }
}
