use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest quote for one asset, converted to a single fiat currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub cmc_rank: Option<u32>,
    pub price: f64,
    pub volume_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub fully_diluted_market_cap: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
}

/// Entry of the top-listings-by-market-cap table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCoin {
    pub rank: Option<u32>,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub market_cap: Option<f64>,
    pub percent_change_24h: Option<f64>,
}

impl From<&Quote> for TopCoin {
    fn from(q: &Quote) -> Self {
        Self {
            rank: q.cmc_rank,
            symbol: q.symbol.clone(),
            name: q.name.clone(),
            price: q.price,
            market_cap: q.market_cap,
            percent_change_24h: q.percent_change_24h,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvCandle {
    pub time_open: DateTime<Utc>,
    pub time_close: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub symbol: String,
    pub candles: Vec<OhlcvCandle>,
}

/// Parameters of a historical OHLCV lookup.
///
/// `time_start` and `time_end` are passed through as given; the vendor accepts
/// RFC 3339 timestamps or `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvQuery {
    pub symbol: String,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub interval: String,
}

impl OhlcvQuery {
    pub fn daily(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            time_start: None,
            time_end: None,
            interval: "daily".to_string(),
        }
    }
}
