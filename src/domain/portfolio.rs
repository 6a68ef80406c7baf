use crate::domain::market::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single asset position as reported by the brokerage holdings endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_code: String,
    pub total_quantity: Decimal,
    pub quantity_available_for_trading: Decimal,
}

/// One page of the holdings listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsPage {
    pub results: Vec<Holding>,
    pub next_cursor: Option<String>,
}

/// A holding joined with quote-vendor data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub symbol: String,
    pub quantity: Decimal,
    pub usd_quote: Option<Quote>,
    pub value_usd: Option<f64>,
    pub dilution_ratio: Option<f64>,
    pub dilution_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_error: Option<String>,
}

impl EnrichedHolding {
    /// A row with no quote attached
    pub fn bare(holding: &Holding) -> Self {
        Self {
            symbol: holding.asset_code.clone(),
            quantity: holding.quantity_available_for_trading,
            usd_quote: None,
            value_usd: None,
            dilution_ratio: None,
            dilution_flag: false,
            quote_error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value_usd: f64,
    pub holdings_count: usize,
    pub priced_count: usize,
    pub unpriced_count: usize,
    pub top_coins_count: usize,
    pub dilution_flags: usize,
}

impl PortfolioSummary {
    pub fn from_rows(rows: &[EnrichedHolding], top_coins_count: usize) -> Self {
        let priced_count = rows.iter().filter(|r| r.value_usd.is_some()).count();

        Self {
            total_value_usd: rows.iter().filter_map(|r| r.value_usd).sum(),
            holdings_count: rows.len(),
            priced_count,
            unpriced_count: rows.len() - priced_count,
            top_coins_count,
            dilution_flags: rows.iter().filter(|r| r.dilution_flag).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(symbol: &str, value: Option<f64>, flagged: bool) -> EnrichedHolding {
        EnrichedHolding {
            symbol: symbol.to_string(),
            quantity: dec!(1),
            usd_quote: None,
            value_usd: value,
            dilution_ratio: None,
            dilution_flag: flagged,
            quote_error: None,
        }
    }

    #[test]
    fn test_summary_counts_priced_and_unpriced() {
        let rows = vec![
            row("BTC", Some(60_000.0), false),
            row("ETH", Some(2_500.5), true),
            row("DOGE", None, false),
        ];

        let summary = PortfolioSummary::from_rows(&rows, 50);

        assert!((summary.total_value_usd - 62_500.5).abs() < 1e-9);
        assert_eq!(summary.holdings_count, 3);
        assert_eq!(summary.priced_count, 2);
        assert_eq!(summary.unpriced_count, 1);
        assert_eq!(summary.top_coins_count, 50);
        assert_eq!(summary.dilution_flags, 1);
    }

    #[test]
    fn test_bare_row_uses_tradable_quantity() {
        let holding = Holding {
            asset_code: "SOL".to_string(),
            total_quantity: dec!(12.5),
            quantity_available_for_trading: dec!(10),
        };

        let row = EnrichedHolding::bare(&holding);
        assert_eq!(row.symbol, "SOL");
        assert_eq!(row.quantity, dec!(10));
        assert!(row.usd_quote.is_none());
        assert!(!row.dilution_flag);
    }
}
