//! Broker and quote-vendor configuration parsing from environment variables.
//!
//! This module handles loading configuration for both remote services:
//! - Robinhood Crypto Trading API (signed requests)
//! - CoinMarketCap Pro API (quote enrichment)

use super::{Lookup, parse_or, validated_url};
use crate::domain::errors::ConfigurationError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ROBINHOOD_BASE_URL: &str = "https://trading.robinhood.com";
pub const DEFAULT_CMC_BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// API key plus base64 Ed25519 seed. The seed never leaves the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub private_key_b64: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("private_key_b64", &"<redacted>")
            .finish()
    }
}

/// Whether signed brokerage calls can be issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerCapability {
    Authenticated,
    Unauthenticated,
}

/// Whether quote enrichment is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteCapability {
    Enabled,
    Disabled,
}

/// Robinhood API configuration
#[derive(Debug, Clone)]
pub struct RobinhoodConfig {
    pub api_key: Option<String>,
    pub private_key_b64: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RobinhoodConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            private_key_b64: None,
            base_url: DEFAULT_ROBINHOOD_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RobinhoodConfig {
    pub(crate) fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, ConfigurationError> {
        let base_url = lookup("ROBINHOOD_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ROBINHOOD_BASE_URL.to_string());

        Ok(Self {
            api_key: lookup("API_KEY").or_else(|| lookup("ROBINHOOD_API_KEY")),
            private_key_b64: lookup("BASE64_PRIVATE_KEY")
                .or_else(|| lookup("ROBINHOOD_BASE64_PRIVATE_KEY")),
            base_url: validated_url("ROBINHOOD_BASE_URL", &base_url)?,
            timeout: Duration::from_secs(parse_or(
                lookup,
                "ROBINHOOD_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
        })
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.private_key_b64) {
            (Some(api_key), Some(private_key_b64)) => Some(Credentials {
                api_key: api_key.clone(),
                private_key_b64: private_key_b64.clone(),
            }),
            _ => None,
        }
    }

    pub fn capability(&self) -> BrokerCapability {
        if self.credentials().is_some() {
            BrokerCapability::Authenticated
        } else {
            BrokerCapability::Unauthenticated
        }
    }
}

/// CoinMarketCap API configuration
#[derive(Clone)]
pub struct CoinMarketCapConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for CoinMarketCapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinMarketCapConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for CoinMarketCapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CMC_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CoinMarketCapConfig {
    pub(crate) fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, ConfigurationError> {
        let base_url =
            lookup("CMC_BASE_URL").unwrap_or_else(|| DEFAULT_CMC_BASE_URL.to_string());

        Ok(Self {
            api_key: lookup("CMC_API_KEY"),
            base_url: validated_url("CMC_BASE_URL", &base_url)?,
            timeout: Duration::from_secs(parse_or(lookup, "CMC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
        })
    }

    pub fn capability(&self) -> QuoteCapability {
        if self.api_key.is_some() {
            QuoteCapability::Enabled
        } else {
            QuoteCapability::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).filter(|v| !v.is_empty()).cloned()
    }

    #[test]
    fn test_robinhood_config_defaults() {
        let lookup = lookup_from(&[]);
        let config = RobinhoodConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.base_url, "https://trading.robinhood.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.capability(), BrokerCapability::Unauthenticated);
    }

    #[test]
    fn test_robinhood_fallback_variable_names() {
        let lookup = lookup_from(&[
            ("ROBINHOOD_API_KEY", "rh-api-fallback"),
            ("ROBINHOOD_BASE64_PRIVATE_KEY", "c2VlZA=="),
        ]);
        let config = RobinhoodConfig::from_lookup(&lookup).unwrap();
        let creds = config.credentials().unwrap();
        assert_eq!(creds.api_key, "rh-api-fallback");
        assert_eq!(creds.private_key_b64, "c2VlZA==");
    }

    #[test]
    fn test_primary_names_take_precedence() {
        let lookup = lookup_from(&[
            ("API_KEY", "rh-api-primary"),
            ("ROBINHOOD_API_KEY", "rh-api-fallback"),
            ("BASE64_PRIVATE_KEY", "cHJpbWFyeQ=="),
        ]);
        let config = RobinhoodConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("rh-api-primary"));
        assert_eq!(config.capability(), BrokerCapability::Authenticated);
    }

    #[test]
    fn test_half_configured_credentials_are_unauthenticated() {
        let lookup = lookup_from(&[("API_KEY", "rh-api-only")]);
        let config = RobinhoodConfig::from_lookup(&lookup).unwrap();
        assert!(config.credentials().is_none());
        assert_eq!(config.capability(), BrokerCapability::Unauthenticated);
    }

    #[test]
    fn test_cmc_capability_follows_key() {
        let disabled = CoinMarketCapConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(disabled.capability(), QuoteCapability::Disabled);
        assert!(disabled.base_url.contains("coinmarketcap.com"));

        let enabled =
            CoinMarketCapConfig::from_lookup(&lookup_from(&[("CMC_API_KEY", "cmc-key")])).unwrap();
        assert_eq!(enabled.capability(), QuoteCapability::Enabled);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials {
            api_key: "rh-api-key".to_string(),
            private_key_b64: "super-secret-seed".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("rh-api-key"));
        assert!(!rendered.contains("super-secret-seed"));
    }
}
