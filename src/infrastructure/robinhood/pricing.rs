use super::client::RobinhoodClient;
use super::models::first_result_decimal;
use crate::domain::envelope::client_error_of;
use crate::domain::errors::PricingError;
use rust_decimal::Decimal;
use serde_json::Value;

/// Current price for a trading pair (e.g. `BTC-USD`) from best bid/ask data.
pub async fn get_price(client: &RobinhoodClient, symbol: &str) -> Result<Decimal, PricingError> {
    let payload = client.get_best_bid_ask(&[symbol]).await?;
    price_from_payload(symbol, &payload)
}

/// Expects `{ "results": [ { "price": "<number-as-string>", ... } ] }`
pub fn price_from_payload(symbol: &str, payload: &Value) -> Result<Decimal, PricingError> {
    if let Some(envelope) = client_error_of(payload) {
        return Err(PricingError::Client {
            symbol: symbol.to_string(),
            envelope,
        });
    }

    first_result_decimal(payload, "price").map_err(|source| PricingError::Parsing {
        symbol: symbol.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobinhoodConfig;
    use crate::domain::envelope::ErrorEnvelope;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_price_from_best_bid_ask() {
        let payload = json!({
            "results": [{
                "symbol": "BTC-USD",
                "price": "67012.3400",
                "bid_inclusive_of_sell_spread": "66800.00",
                "ask_inclusive_of_buy_spread": "67224.68"
            }]
        });
        assert_eq!(price_from_payload("BTC-USD", &payload).unwrap(), dec!(67012.34));
    }

    #[test]
    fn test_client_error_is_surfaced() {
        let payload = ErrorEnvelope::client_error("Request error: timed out").into_value();
        let err = price_from_payload("BTC-USD", &payload).unwrap_err();
        assert!(matches!(err, PricingError::Client { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_missing_price_carries_payload() {
        let payload = json!({ "results": [{ "symbol": "BTC-USD" }] });
        let err = price_from_payload("BTC-USD", &payload).unwrap_err();
        match err {
            PricingError::Parsing { symbol, source } => {
                assert_eq!(symbol, "BTC-USD");
                assert!(source.to_string().contains("\"symbol\":\"BTC-USD\""));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_price_without_credentials() {
        let client = RobinhoodClient::new(&RobinhoodConfig::default()).unwrap();
        let err = get_price(&client, "BTC-USD").await.unwrap_err();
        assert!(matches!(err, PricingError::Request(_)));
    }
}
