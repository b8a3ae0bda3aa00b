// * Runtime settings, read from the environment with constant defaults

use crate::config::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USER_AGENT, REDIRECT_TIMEOUT_SECS,
};
use crate::engine::amazon::MissingQueryPolicy;
use crate::ops::telemetry::LogFormat;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

pub const ENV_HOST: &str = "URL_TIDY_HOST";
pub const ENV_PORT: &str = "URL_TIDY_PORT";
pub const ENV_REDIRECT_TIMEOUT: &str = "URL_TIDY_REDIRECT_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "URL_TIDY_USER_AGENT";
pub const ENV_MISSING_QUERY: &str = "URL_TIDY_MISSING_QUERY";
pub const ENV_LOG_FORMAT: &str = "URL_TIDY_LOG_FORMAT";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub redirect_timeout: Duration,
    pub user_agent: String,
    pub missing_query: MissingQueryPolicy,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.parse().unwrap_or(IpAddr::from([0, 0, 0, 0])),
            port: DEFAULT_PORT,
            redirect_timeout: Duration::from_secs(REDIRECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            missing_query: MissingQueryPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    // * Loads settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // * Loads settings through an arbitrary lookup so tests never touch the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_HOST) {
            settings.host = parse_var(ENV_HOST, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PORT) {
            settings.port = parse_var(ENV_PORT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REDIRECT_TIMEOUT) {
            let secs: u64 = parse_var(ENV_REDIRECT_TIMEOUT, &raw)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_REDIRECT_TIMEOUT,
                    value: raw,
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            settings.redirect_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_USER_AGENT) {
            if !raw.trim().is_empty() {
                settings.user_agent = raw;
            }
        }
        if let Some(raw) = lookup(ENV_MISSING_QUERY) {
            settings.missing_query = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: ENV_MISSING_QUERY,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            settings.log_format = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: ENV_LOG_FORMAT,
                value: raw.clone(),
                reason,
            })?;
        }

        Ok(settings)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
