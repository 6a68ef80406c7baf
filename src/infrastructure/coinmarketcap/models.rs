//! CoinMarketCap response DTOs and their conversion into domain records.

use crate::domain::errors::{ParsingError, QuoteError};
use crate::domain::market::{OhlcvCandle, OhlcvSeries, Quote, TopCoin};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// `(error_code, error_message)` when the envelope reports a failure
pub fn vendor_status(payload: &Value) -> Option<(i64, String)> {
    let status = payload.get("status")?;
    let code = status.get("error_code").and_then(Value::as_i64).unwrap_or(0);
    if code == 0 {
        return None;
    }
    let message = status
        .get("error_message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("CMC API error")
        .to_string();
    Some((code, message))
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Debug, Deserialize)]
struct CmcCoin {
    name: String,
    symbol: String,
    #[serde(default)]
    cmc_rank: Option<u32>,
    quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcQuote {
    price: Option<f64>,
    volume_24h: Option<f64>,
    market_cap: Option<f64>,
    fully_diluted_market_cap: Option<f64>,
    percent_change_1h: Option<f64>,
    percent_change_24h: Option<f64>,
    percent_change_7d: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CmcOhlcvData {
    symbol: String,
    quotes: Vec<CmcOhlcvEntry>,
}

#[derive(Debug, Deserialize)]
struct CmcOhlcvEntry {
    time_open: DateTime<Utc>,
    time_close: DateTime<Utc>,
    quote: HashMap<String, CmcOhlcvQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcOhlcvQuote {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
    market_cap: Option<f64>,
}

fn decode<T: DeserializeOwned>(payload: &Value, what: &str) -> Result<T, ParsingError> {
    serde_json::from_value(payload.clone()).map_err(|e| ParsingError::MissingField {
        field: format!("{} ({})", what, e),
        payload: payload.to_string(),
    })
}

fn missing(field: String, payload: &Value) -> ParsingError {
    ParsingError::MissingField {
        field,
        payload: payload.to_string(),
    }
}

impl CmcCoin {
    fn into_quote(self, convert: &str, payload: &Value) -> Result<Quote, ParsingError> {
        let q = self
            .quote
            .get(convert)
            .ok_or_else(|| missing(format!("{}.quote.{}", self.symbol, convert), payload))?;
        let price = q
            .price
            .ok_or_else(|| missing(format!("{}.quote.{}.price", self.symbol, convert), payload))?;

        Ok(Quote {
            price,
            volume_24h: q.volume_24h,
            market_cap: q.market_cap,
            fully_diluted_market_cap: q.fully_diluted_market_cap,
            percent_change_1h: q.percent_change_1h,
            percent_change_24h: q.percent_change_24h,
            percent_change_7d: q.percent_change_7d,
            symbol: self.symbol,
            name: self.name,
            cmc_rank: self.cmc_rank,
        })
    }
}

/// `/cryptocurrency/quotes/latest` keyed by symbol; the first match wins
pub fn parse_latest_quote(payload: &Value, symbol: &str, convert: &str) -> Result<Quote, QuoteError> {
    let envelope: Envelope<HashMap<String, OneOrMany<CmcCoin>>> = decode(payload, "data")?;

    let coin = envelope
        .data
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(symbol))
        .and_then(|(_, coins)| match coins {
            OneOrMany::One(coin) => Some(coin),
            OneOrMany::Many(coins) => coins.into_iter().next(),
        })
        .ok_or_else(|| QuoteError::UnknownSymbol {
            symbol: symbol.to_string(),
        })?;

    Ok(coin.into_quote(convert, payload)?)
}

/// `/cryptocurrency/listings/latest`; entries without a price are skipped
pub fn parse_top_listings(payload: &Value, convert: &str) -> Result<Vec<TopCoin>, QuoteError> {
    let envelope: Envelope<Vec<CmcCoin>> = decode(payload, "data")?;

    Ok(envelope
        .data
        .into_iter()
        .filter_map(|coin| coin.into_quote(convert, payload).ok())
        .map(|quote| TopCoin::from(&quote))
        .collect())
}

/// `/cryptocurrency/ohlcv/historical`
pub fn parse_ohlcv(payload: &Value, convert: &str) -> Result<OhlcvSeries, QuoteError> {
    let envelope: Envelope<CmcOhlcvData> = decode(payload, "data")?;

    let candles = envelope
        .data
        .quotes
        .into_iter()
        .map(|entry| {
            let q = entry
                .quote
                .get(convert)
                .ok_or_else(|| missing(format!("quotes[].quote.{}", convert), payload))?;
            Ok(OhlcvCandle {
                time_open: entry.time_open,
                time_close: entry.time_close,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                market_cap: q.market_cap,
            })
        })
        .collect::<Result<Vec<_>, ParsingError>>()?;

    Ok(OhlcvSeries {
        symbol: envelope.data.symbol,
        candles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn btc_coin() -> Value {
        json!({
            "id": 1,
            "name": "Bitcoin",
            "symbol": "BTC",
            "cmc_rank": 1,
            "quote": {
                "USD": {
                    "price": 64000.5,
                    "volume_24h": 31000000000.0,
                    "market_cap": 1260000000000.0,
                    "fully_diluted_market_cap": 1344000000000.0,
                    "percent_change_1h": 0.12,
                    "percent_change_24h": -1.5,
                    "percent_change_7d": 4.2
                }
            }
        })
    }

    #[test]
    fn test_vendor_status() {
        let ok = json!({ "status": { "error_code": 0, "error_message": null } });
        assert!(vendor_status(&ok).is_none());

        let failed = json!({ "status": { "error_code": 1001, "error_message": "This API Key is invalid." } });
        assert_eq!(
            vendor_status(&failed),
            Some((1001, "This API Key is invalid.".to_string()))
        );
    }

    #[test]
    fn test_parse_latest_quote_object_form() {
        let payload = json!({ "status": { "error_code": 0 }, "data": { "BTC": btc_coin() } });
        let quote = parse_latest_quote(&payload, "btc", "USD").unwrap();

        assert_eq!(quote.symbol, "BTC");
        assert_eq!(quote.cmc_rank, Some(1));
        assert_eq!(quote.price, 64000.5);
        assert_eq!(quote.percent_change_24h, Some(-1.5));
    }

    #[test]
    fn test_parse_latest_quote_array_form() {
        let payload = json!({ "data": { "BTC": [btc_coin()] } });
        let quote = parse_latest_quote(&payload, "BTC", "USD").unwrap();
        assert_eq!(quote.name, "Bitcoin");
    }

    #[test]
    fn test_unknown_symbol() {
        let payload = json!({ "data": {} });
        let err = parse_latest_quote(&payload, "NOPE", "USD").unwrap_err();
        assert!(matches!(err, QuoteError::UnknownSymbol { .. }));
    }

    #[test]
    fn test_null_market_caps_are_kept_as_none() {
        let mut coin = btc_coin();
        coin["quote"]["USD"]["fully_diluted_market_cap"] = Value::Null;
        let payload = json!({ "data": { "BTC": coin } });

        let quote = parse_latest_quote(&payload, "BTC", "USD").unwrap();
        assert!(quote.fully_diluted_market_cap.is_none());
    }

    #[test]
    fn test_parse_top_listings() {
        let mut eth = btc_coin();
        eth["symbol"] = json!("ETH");
        eth["name"] = json!("Ethereum");
        eth["cmc_rank"] = json!(2);
        let payload = json!({ "data": [btc_coin(), eth] });

        let top = parse_top_listings(&payload, "USD").unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].symbol, "ETH");
        assert_eq!(top[1].rank, Some(2));
    }

    #[test]
    fn test_parse_ohlcv() {
        let payload = json!({
            "data": {
                "id": 1,
                "name": "Bitcoin",
                "symbol": "BTC",
                "quotes": [{
                    "time_open": "2024-01-01T00:00:00.000Z",
                    "time_close": "2024-01-01T23:59:59.999Z",
                    "quote": {
                        "USD": {
                            "open": 42000.0,
                            "high": 44000.0,
                            "low": 41500.0,
                            "close": 43800.0,
                            "volume": 21000000000.0,
                            "market_cap": 858000000000.0,
                            "timestamp": "2024-01-01T23:59:59.999Z"
                        }
                    }
                }]
            }
        });

        let series = parse_ohlcv(&payload, "USD").unwrap();
        assert_eq!(series.symbol, "BTC");
        assert_eq!(series.candles.len(), 1);
        assert_eq!(series.candles[0].close, 43800.0);
        assert_eq!(series.candles[0].time_open.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
