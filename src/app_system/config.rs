use std::time::Duration;
use thiserror::Error;

use crate::domain::DEFAULT_TOAST_DURATION;

pub const API_BASE_URL_VAR: &str = "STOREFRONT_API_BASE_URL";
pub const TOAST_DURATION_VAR: &str = "STOREFRONT_TOAST_DURATION_MS";
pub const CHANNEL_BUFFER_VAR: &str = "STOREFRONT_CHANNEL_BUFFER";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings for the storefront client.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Used for toasts created without an explicit duration. Zero keeps them until dismissed.
    pub default_toast_duration: Duration,
    /// Mailbox size for each actor.
    pub channel_buffer: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            default_toast_duration: DEFAULT_TOAST_DURATION,
            channel_buffer: 32,
            user_agent: concat!("storefront-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup. The base URL is mandatory; the
    /// rest fall back to defaults when unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = lookup(API_BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingVar(API_BASE_URL_VAR))?;
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: API_BASE_URL_VAR,
                value: api_base_url,
            });
        }

        let default_toast_duration = match lookup(TOAST_DURATION_VAR) {
            Some(raw) => Duration::from_millis(parse(TOAST_DURATION_VAR, &raw)?),
            None => defaults.default_toast_duration,
        };

        let channel_buffer = match lookup(CHANNEL_BUFFER_VAR) {
            Some(raw) => match parse::<usize>(CHANNEL_BUFFER_VAR, &raw)? {
                // mpsc channels need room for at least one message
                0 => {
                    return Err(ConfigError::InvalidValue {
                        key: CHANNEL_BUFFER_VAR,
                        value: raw,
                    })
                }
                n => n,
            },
            None => defaults.channel_buffer,
        };

        Ok(Self {
            api_base_url,
            default_toast_duration,
            channel_buffer,
            user_agent: defaults.user_agent,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
