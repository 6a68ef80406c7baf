use robinfolio::domain::errors::QuoteError;
use robinfolio::domain::market::OhlcvQuery;
use robinfolio::domain::ports::QuoteProvider;
use robinfolio::infrastructure::CoinMarketCapClient;
use robinfolio::infrastructure::mock::{RecordingSleeper, ScriptedTransport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn history_payload() -> serde_json::Value {
    json!({
        "status": { "error_code": 0, "error_message": null },
        "data": {
            "id": 1027,
            "name": "Ethereum",
            "symbol": "ETH",
            "quotes": [
                {
                    "time_open": "2024-01-01T00:00:00.000Z",
                    "time_close": "2024-01-01T23:59:59.999Z",
                    "quote": { "USD": { "open": 2281.5, "high": 2352.3, "low": 2265.0, "close": 2352.0, "volume": 7.5e9 } }
                },
                {
                    "time_open": "2024-01-02T00:00:00.000Z",
                    "time_close": "2024-01-02T23:59:59.999Z",
                    "quote": { "USD": { "open": 2352.0, "high": 2431.2, "low": 2341.8, "close": 2355.3, "volume": 1.1e10 } }
                }
            ]
        }
    })
}

#[test]
fn test_history_recovers_after_two_failures() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(QuoteError::Transport {
            reason: "operation timed out".to_string(),
        }),
        Err(QuoteError::Http { status: 500 }),
        Ok(history_payload()),
    ]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CoinMarketCapClient::with_transport(transport.clone(), sleeper.clone());

    let query = OhlcvQuery {
        time_start: Some("2024-01-01".to_string()),
        time_end: Some("2024-01-02".to_string()),
        ..OhlcvQuery::daily("eth")
    };
    let series = tokio_test::block_on(client.historical_ohlcv(&query)).unwrap();

    assert_eq!(series.candles.len(), 2);
    assert_eq!(series.candles[1].close, 2355.3);
    assert_eq!(transport.calls().len(), 3);
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(1), Duration::from_secs(3)]
    );
}

#[test]
fn test_vendor_error_is_retried_then_reported() {
    let vendor_error = || {
        Ok(json!({
            "status": { "error_code": 1008, "error_message": "You've exceeded your API Key's HTTP request rate limit." }
        }))
    };
    let transport = Arc::new(ScriptedTransport::new(vec![vendor_error(), vendor_error(), vendor_error()]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CoinMarketCapClient::with_transport(transport.clone(), sleeper.clone());

    let err = tokio_test::block_on(client.historical_ohlcv(&OhlcvQuery::daily("BTC"))).unwrap_err();

    assert!(matches!(err, QuoteError::Vendor { code: 1008, .. }));
    assert_eq!(transport.calls().len(), 3);
    assert_eq!(sleeper.slept().len(), 2);
}

#[test]
fn test_latest_quote_is_single_attempt() {
    let transport = Arc::new(ScriptedTransport::new(vec![Err(QuoteError::Http { status: 503 })]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CoinMarketCapClient::with_transport(transport.clone(), sleeper.clone());

    assert!(tokio_test::block_on(client.latest_quote("BTC")).is_err());
    assert_eq!(transport.calls().len(), 1);
    assert!(sleeper.slept().is_empty());
}
