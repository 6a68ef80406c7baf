use crate::domain::errors::{PortfolioError, QuoteError};
use crate::domain::market::{OhlcvQuery, OhlcvSeries, Quote, TopCoin};
use crate::domain::portfolio::Holding;
use async_trait::async_trait;

// Need async_trait for async functions in trait objects
#[async_trait]
pub trait HoldingsProvider: Send + Sync {
    /// Every holding on the account, optionally filtered by asset code
    async fn holdings(&self, asset_codes: &[String]) -> Result<Vec<Holding>, PortfolioError>;
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
    async fn top_listings(&self, limit: u32, convert: &str) -> Result<Vec<TopCoin>, QuoteError>;
    async fn historical_ohlcv(&self, query: &OhlcvQuery) -> Result<OhlcvSeries, QuoteError>;
}
