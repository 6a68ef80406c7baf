//! Configuration module for robinfolio.
//!
//! One explicit [`Config`] is built at process start and handed to the
//! clients and the reporter. Nothing else reads the environment.

mod broker_config;
mod snapshot_config;

pub use broker_config::{
    BrokerCapability, CoinMarketCapConfig, Credentials, DEFAULT_CMC_BASE_URL,
    DEFAULT_ROBINHOOD_BASE_URL, QuoteCapability, RobinhoodConfig,
};
pub use snapshot_config::SnapshotEnvConfig;

use crate::domain::errors::ConfigurationError;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub(crate) type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub robinhood: RobinhoodConfig,
    pub coinmarketcap: CoinMarketCapConfig,
    pub snapshot: SnapshotEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            robinhood: RobinhoodConfig::from_lookup(&lookup)?,
            coinmarketcap: CoinMarketCapConfig::from_lookup(&lookup)?,
            snapshot: SnapshotEnvConfig::from_lookup(&lookup),
        })
    }

    pub fn broker_capability(&self) -> BrokerCapability {
        self.robinhood.capability()
    }

    pub fn quote_capability(&self) -> QuoteCapability {
        self.coinmarketcap.capability()
    }
}

pub(crate) fn parse_or<T: FromStr + Copy>(lookup: &Lookup<'_>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}

pub(crate) fn validated_url(key: &'static str, raw: &str) -> Result<String, ConfigurationError> {
    url::Url::parse(raw).map_err(|e| ConfigurationError::InvalidValue {
        key,
        reason: e.to_string(),
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_url_strips_trailing_slash() {
        assert_eq!(
            validated_url("ROBINHOOD_BASE_URL", "https://trading.robinhood.com/").unwrap(),
            "https://trading.robinhood.com"
        );
    }

    #[test]
    fn test_validated_url_rejects_garbage() {
        let err = validated_url("CMC_BASE_URL", "not a url").unwrap_err();
        assert!(err.to_string().contains("CMC_BASE_URL"));
    }
}
