use crate::domain::errors::{PortfolioError, QuoteError};
use crate::domain::market::{OhlcvQuery, OhlcvSeries, Quote, TopCoin};
use crate::domain::portfolio::Holding;
use crate::domain::ports::{HoldingsProvider, QuoteProvider};
use crate::infrastructure::coinmarketcap::transport::VendorTransport;
use crate::infrastructure::core::retry::Sleeper;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// Fixed list of holdings, optionally filtered by asset code like the live endpoint.
#[derive(Default)]
pub struct MockHoldingsProvider {
    holdings: Vec<Holding>,
    failure: Option<fn() -> PortfolioError>,
}

impl MockHoldingsProvider {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            failure: None,
        }
    }

    /// Every call fails with the error produced by `failure`
    pub fn failing(failure: fn() -> PortfolioError) -> Self {
        Self {
            holdings: Vec::new(),
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl HoldingsProvider for MockHoldingsProvider {
    async fn holdings(&self, asset_codes: &[String]) -> Result<Vec<Holding>, PortfolioError> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }

        Ok(self
            .holdings
            .iter()
            .filter(|h| asset_codes.is_empty() || asset_codes.contains(&h.asset_code))
            .cloned()
            .collect())
    }
}

/// In-memory quote source. Symbols without a quote answer `UnknownSymbol`.
#[derive(Default)]
pub struct MockQuoteProvider {
    quotes: HashMap<String, Quote>,
    failing_symbols: HashMap<String, String>,
    top: Vec<TopCoin>,
    top_fails: bool,
}

impl MockQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.insert(quote.symbol.to_uppercase(), quote);
        self
    }

    /// `latest_quote` for `symbol` fails with a transport error carrying `reason`
    pub fn with_failure(mut self, symbol: &str, reason: &str) -> Self {
        self.failing_symbols
            .insert(symbol.to_uppercase(), reason.to_string());
        self
    }

    pub fn with_top(mut self, top: Vec<TopCoin>) -> Self {
        self.top = top;
        self
    }

    pub fn with_failing_top(mut self) -> Self {
        self.top_fails = true;
        self
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let key = symbol.to_uppercase();
        if let Some(reason) = self.failing_symbols.get(&key) {
            return Err(QuoteError::Transport {
                reason: reason.clone(),
            });
        }
        self.quotes
            .get(&key)
            .cloned()
            .ok_or(QuoteError::UnknownSymbol { symbol: key })
    }

    async fn top_listings(&self, limit: u32, _convert: &str) -> Result<Vec<TopCoin>, QuoteError> {
        if self.top_fails {
            return Err(QuoteError::Http { status: 429 });
        }
        Ok(self.top.iter().take(limit as usize).cloned().collect())
    }

    async fn historical_ohlcv(&self, query: &OhlcvQuery) -> Result<OhlcvSeries, QuoteError> {
        Ok(OhlcvSeries {
            symbol: query.symbol.to_uppercase(),
            candles: Vec::new(),
        })
    }
}

/// Replays a fixed sequence of vendor responses and records each request.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, QuoteError>>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<Value, QuoteError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VendorTransport for ScriptedTransport {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, QuoteError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((
                path.to_string(),
                params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
        }

        let next = self.responses.lock().ok().and_then(|mut r| r.pop_front());
        next.unwrap_or_else(|| {
            Err(QuoteError::Transport {
                reason: "script exhausted".to_string(),
            })
        })
    }
}

/// Records requested delays instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        info!("RecordingSleeper: skipping {:?}", duration);
        if let Ok(mut slept) = self.slept.lock() {
            slept.push(duration);
        }
    }
}
