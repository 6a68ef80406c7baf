//! Typed parsing of brokerage payloads.
//!
//! The client itself returns raw JSON; these helpers are the boundary where it
//! becomes domain records.

use crate::domain::errors::ParsingError;
use crate::domain::portfolio::{Holding, HoldingsPage};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    next: Option<String>,
    results: Vec<HoldingDto>,
}

#[derive(Debug, Deserialize)]
struct HoldingDto {
    asset_code: String,
    #[serde(default)]
    total_quantity: Option<Decimal>,
    quantity_available_for_trading: Decimal,
}

pub fn parse_holdings_page(payload: &Value) -> Result<HoldingsPage, ParsingError> {
    if payload.get("results").is_none() {
        return Err(missing("results", payload));
    }

    let response: HoldingsResponse =
        serde_json::from_value(payload.clone()).map_err(|e| ParsingError::MissingField {
            field: format!("results ({})", e),
            payload: payload.to_string(),
        })?;

    let results = response
        .results
        .into_iter()
        .map(|h| Holding {
            total_quantity: h.total_quantity.unwrap_or(h.quantity_available_for_trading),
            asset_code: h.asset_code,
            quantity_available_for_trading: h.quantity_available_for_trading,
        })
        .collect();

    Ok(HoldingsPage {
        results,
        next_cursor: response.next.as_deref().and_then(cursor_from_next),
    })
}

/// Pulls the `cursor` parameter out of a `next` link, absolute or relative.
///
/// The value is kept percent-encoded exactly as the server sent it: it is
/// pasted back into a signed path, so decoding would change what is signed.
pub fn cursor_from_next(next: &str) -> Option<String> {
    let base = url::Url::parse("https://trading.robinhood.com/").ok()?;
    let url = base.join(next).ok()?;
    url.query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("cursor="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reads `results[0].<field>` as a decimal, accepting string or number values.
pub fn first_result_decimal(payload: &Value, field: &str) -> Result<Decimal, ParsingError> {
    let path = format!("results[0].{}", field);
    let raw = payload
        .get("results")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get(field))
        .ok_or_else(|| missing(&path, payload))?;

    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(missing(&path, payload)),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ParsingError::InvalidNumber {
            field: path,
            value: text,
        })
}

fn missing(field: &str, payload: &Value) -> ParsingError {
    ParsingError::MissingField {
        field: field.to_string(),
        payload: payload.to_string(),
    }
}
