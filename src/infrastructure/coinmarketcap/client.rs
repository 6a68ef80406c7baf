//! CoinMarketCap Pro API quote client
//!
//! Latest quotes and top listings are single attempts. Historical OHLCV is
//! retried up to three times with a linear backoff of 1s then 3s, but only
//! for transport, HTTP status and vendor status failures.

use super::models::{parse_latest_quote, parse_ohlcv, parse_top_listings, vendor_status};
use super::transport::{HttpVendorTransport, VendorTransport};
use crate::config::CoinMarketCapConfig;
use crate::domain::errors::QuoteError;
use crate::domain::market::{OhlcvQuery, OhlcvSeries, Quote, TopCoin};
use crate::domain::ports::QuoteProvider;
use crate::infrastructure::core::retry::{Sleeper, TokioSleeper, retry_with_backoff};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const QUOTES_LATEST_PATH: &str = "/cryptocurrency/quotes/latest";
const OHLCV_HISTORICAL_PATH: &str = "/cryptocurrency/ohlcv/historical";
const LISTINGS_LATEST_PATH: &str = "/cryptocurrency/listings/latest";

const QUOTE_CONVERT: &str = "USD";
const OHLCV_MAX_ATTEMPTS: u32 = 3;

pub struct CoinMarketCapClient {
    transport: Arc<dyn VendorTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl CoinMarketCapClient {
    /// `None` when no API key is configured.
    pub fn from_config(config: &CoinMarketCapConfig) -> Result<Option<Self>, QuoteError> {
        let Some(api_key) = config.api_key.as_deref() else {
            info!("CMC_API_KEY not set, quote enrichment disabled");
            return Ok(None);
        };

        let transport = HttpVendorTransport::new(&config.base_url, api_key, config.timeout)?;
        Ok(Some(Self::with_transport(
            Arc::new(transport),
            Arc::new(TokioSleeper),
        )))
    }

    pub fn with_transport(transport: Arc<dyn VendorTransport>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { transport, sleeper }
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Value, QuoteError> {
        let payload = self.transport.get_json(path, params).await?;
        if let Some((code, message)) = vendor_status(&payload) {
            return Err(QuoteError::Vendor { code, message });
        }
        Ok(payload)
    }

    async fn fetch_ohlcv_once(&self, query: &OhlcvQuery) -> Result<OhlcvSeries, QuoteError> {
        let mut params = vec![
            ("symbol", query.symbol.to_uppercase()),
            ("interval", query.interval.clone()),
            ("convert", QUOTE_CONVERT.to_string()),
        ];
        if let Some(start) = &query.time_start {
            params.push(("time_start", start.clone()));
        }
        if let Some(end) = &query.time_end {
            params.push(("time_end", end.clone()));
        }

        let payload = self.fetch(OHLCV_HISTORICAL_PATH, &params).await?;
        parse_ohlcv(&payload, QUOTE_CONVERT)
    }
}

#[async_trait]
impl QuoteProvider for CoinMarketCapClient {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = symbol.to_uppercase();
        debug!("Fetching latest quote for {}", symbol);

        let params = [
            ("symbol", symbol.clone()),
            ("convert", QUOTE_CONVERT.to_string()),
        ];
        let payload = self.fetch(QUOTES_LATEST_PATH, &params).await?;
        parse_latest_quote(&payload, &symbol, QUOTE_CONVERT)
    }

    async fn top_listings(&self, limit: u32, convert: &str) -> Result<Vec<TopCoin>, QuoteError> {
        let convert = convert.to_uppercase();
        let params = [
            ("start", "1".to_string()),
            ("limit", limit.to_string()),
            ("convert", convert.clone()),
        ];
        let payload = self.fetch(LISTINGS_LATEST_PATH, &params).await?;
        parse_top_listings(&payload, &convert)
    }

    async fn historical_ohlcv(&self, query: &OhlcvQuery) -> Result<OhlcvSeries, QuoteError> {
        let name = format!("OHLCV history for {}", query.symbol.to_uppercase());
        retry_with_backoff(
            &name,
            OHLCV_MAX_ATTEMPTS,
            self.sleeper.as_ref(),
            QuoteError::is_transient,
            || self.fetch_ohlcv_once(query),
        )
        .await
    }
}
