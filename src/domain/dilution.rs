//! Token dilution signal.
//!
//! Compares the fully diluted market cap (max supply) against the circulating
//! market cap. A ratio above [`DILUTION_THRESHOLD`] means more than 50% of the
//! supply has yet to be issued.

use crate::domain::snapshot::Snapshot;
use serde::Serialize;

pub const DILUTION_THRESHOLD: f64 = 1.5;

/// `fully_diluted / market_cap`, or `None` when either side is missing or zero.
pub fn dilution_ratio(market_cap: Option<f64>, fully_diluted_market_cap: Option<f64>) -> Option<f64> {
    match (market_cap, fully_diluted_market_cap) {
        (Some(mc), Some(fdv)) if mc != 0.0 && fdv != 0.0 => Some(fdv / mc),
        _ => None,
    }
}

pub fn is_dilution_flagged(ratio: Option<f64>) -> bool {
    ratio.is_some_and(|r| r > DILUTION_THRESHOLD)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DilutionAlert {
    pub symbol: String,
    pub ratio: f64,
}

/// Flagged holdings of a stored snapshot, recomputed from its quotes.
pub fn dilution_alerts(snapshot: &Snapshot) -> Vec<DilutionAlert> {
    snapshot
        .holdings
        .iter()
        .filter_map(|row| {
            let quote = row.usd_quote.as_ref()?;
            let ratio = dilution_ratio(quote.market_cap, quote.fully_diluted_market_cap)?;
            is_dilution_flagged(Some(ratio)).then(|| DilutionAlert {
                symbol: row.symbol.clone(),
                ratio,
            })
        })
        .collect()
}
