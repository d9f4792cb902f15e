//! Configuration loading and representation.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use dealership_observability::LogFormat;

use crate::coordinator::DEFAULT_LOCK_TIMEOUT;

pub const ENV_BIND_ADDR: &str = "DEALERSHIP_BIND_ADDR";
pub const ENV_LOCK_TIMEOUT_MS: &str = "DEALERSHIP_LOCK_TIMEOUT_MS";
pub const ENV_VIN_SEED: &str = "DEALERSHIP_VIN_SEED";
pub const ENV_LOG_FORMAT: &str = "DEALERSHIP_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: '{value}' ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Bounded wait for a VIN held by another transaction.
    pub lock_timeout: Duration,
    /// Seed for deterministic VIN allocation; `None` draws from OS entropy.
    pub vin_seed: Option<u64>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            vin_seed: None,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Load from the process environment; unset keys take their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse(
            ENV_BIND_ADDR,
            &lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let lock_timeout = match lookup(ENV_LOCK_TIMEOUT_MS) {
            Some(raw) => Duration::from_millis(parse::<u64>(ENV_LOCK_TIMEOUT_MS, &raw)?),
            None => DEFAULT_LOCK_TIMEOUT,
        };

        let vin_seed = lookup(ENV_VIN_SEED)
            .map(|raw| parse::<u64>(ENV_VIN_SEED, &raw))
            .transpose()?;

        let log_format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => parse(ENV_LOG_FORMAT, &raw)?,
            None => LogFormat::Json,
        };

        Ok(Self {
            bind_addr,
            lock_timeout,
            vin_seed,
            log_format,
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
