// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the typed configuration loaded
//! from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_ACCESS_SECRET` | HS256 secret for access tokens (≥ 32 bytes) | Required |
//! | `JWT_REFRESH_SECRET` | HS256 secret for refresh tokens (≥ 32 bytes) | Required |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime | `3600` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime | `1209600` |
//! | `SESSION_CACHE_TTL_SECS` | Identity → member id cache lifetime | `1800` |
//! | `CACHE_URL` | Redis URL for the TTL cache | In-process cache |
//! | `CACHE_CAPACITY` | Entry limit of the in-process cache | `100000` |
//! | `SEED_MEMBER_IDENTITY` | Member registered at startup | Optional |
//! | `SEED_MEMBER_PASSWORD` | Password of the seed member | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::time::Duration;

use crate::auth::codec::MIN_SECRET_LEN;
use crate::auth::SigningSecret;
use crate::storage::ttl_cache::DEFAULT_CAPACITY;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Secret for signing access tokens. Must differ from the refresh secret.
pub const ACCESS_SECRET_ENV: &str = "JWT_ACCESS_SECRET";
/// Secret for signing refresh tokens.
pub const REFRESH_SECRET_ENV: &str = "JWT_REFRESH_SECRET";

pub const ACCESS_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";
pub const REFRESH_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";
pub const SESSION_TTL_ENV: &str = "SESSION_CACHE_TTL_SECS";

/// Redis connection URL. When unset the in-process cache is used, which does
/// not survive restarts and is not shared between replicas.
pub const CACHE_URL_ENV: &str = "CACHE_URL";
pub const CACHE_CAPACITY_ENV: &str = "CACHE_CAPACITY";

pub const SEED_IDENTITY_ENV: &str = "SEED_MEMBER_IDENTITY";
pub const SEED_PASSWORD_ENV: &str = "SEED_MEMBER_PASSWORD";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 14 * 24 * 60 * 60;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
/// Upper bound for any configured lifetime (ten years).
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Token secrets and lifetimes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: SigningSecret,
    pub refresh_secret: SigningSecret,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub session_ttl: Duration,
}

/// Member registered at startup, for development deployments.
#[derive(Clone)]
pub struct SeedMember {
    pub identity: String,
    pub password: String,
}

impl fmt::Debug for SeedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedMember")
            .field("identity", &self.identity)
            .field("password", &"***")
            .finish()
    }
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub cache_url: Option<String>,
    pub cache_capacity: usize,
    pub seed_member: Option<SeedMember>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let access_secret = secret(ACCESS_SECRET_ENV, get(ACCESS_SECRET_ENV))?;
        let refresh_secret = secret(REFRESH_SECRET_ENV, get(REFRESH_SECRET_ENV))?;
        if access_secret.as_bytes() == refresh_secret.as_bytes() {
            return Err(ConfigError::Invalid {
                name: REFRESH_SECRET_ENV,
                reason: format!("must differ from {ACCESS_SECRET_ENV}"),
            });
        }

        let auth = AuthConfig {
            access_secret,
            refresh_secret,
            access_ttl: ttl(ACCESS_TTL_ENV, get(ACCESS_TTL_ENV), DEFAULT_ACCESS_TTL_SECS)?,
            refresh_ttl: ttl(REFRESH_TTL_ENV, get(REFRESH_TTL_ENV), DEFAULT_REFRESH_TTL_SECS)?,
            session_ttl: ttl(SESSION_TTL_ENV, get(SESSION_TTL_ENV), DEFAULT_SESSION_TTL_SECS)?,
        };

        let port = match get(PORT_ENV) {
            Some(raw) => parse(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };

        let cache_capacity = match get(CACHE_CAPACITY_ENV) {
            Some(raw) => match parse::<usize>(CACHE_CAPACITY_ENV, &raw)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        name: CACHE_CAPACITY_ENV,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                n => n,
            },
            None => DEFAULT_CAPACITY,
        };

        let seed_member = match (get(SEED_IDENTITY_ENV), get(SEED_PASSWORD_ENV)) {
            (Some(identity), Some(password)) => Some(SeedMember { identity, password }),
            (Some(_), None) => return Err(ConfigError::Missing(SEED_PASSWORD_ENV)),
            _ => None,
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            auth,
            cache_url: get(CACHE_URL_ENV),
            cache_capacity,
            seed_member,
            log_format: LogFormat::parse(get(LOG_FORMAT_ENV).as_deref()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn secret(name: &'static str, value: Option<String>) -> Result<SigningSecret, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(name))?;
    if value.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
        });
    }
    Ok(SigningSecret::new(value.into_bytes()))
}

fn ttl(
    name: &'static str,
    value: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let secs = match value {
        Some(raw) => parse::<u64>(name, &raw)?,
        None => default_secs,
    };
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    if secs > MAX_TTL_SECS {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("must be at most {MAX_TTL_SECS} seconds"),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
