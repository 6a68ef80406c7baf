//! Portfolio Reporter
//!
//! Joins brokerage holdings with vendor quotes and assembles daily snapshots.
//! A failed quote affects only its own row; a failed top-listings call yields
//! an empty table. Without a quote provider rows carry holdings only.

use crate::domain::dilution::{dilution_ratio, is_dilution_flagged};
use crate::domain::errors::PortfolioError;
use crate::domain::market::TopCoin;
use crate::domain::portfolio::{EnrichedHolding, Holding, PortfolioSummary};
use crate::domain::ports::{HoldingsProvider, QuoteProvider};
use crate::domain::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use std::fmt::Write;
use tracing::{debug, info, warn};

pub struct PortfolioReporter<'a> {
    holdings: &'a dyn HoldingsProvider,
    quotes: Option<&'a dyn QuoteProvider>,
}

impl<'a> PortfolioReporter<'a> {
    pub fn new(holdings: &'a dyn HoldingsProvider, quotes: Option<&'a dyn QuoteProvider>) -> Self {
        Self { holdings, quotes }
    }

    /// Every holding, one row each, in brokerage order.
    pub async fn enriched_holdings(&self) -> Result<Vec<EnrichedHolding>, PortfolioError> {
        let holdings = self.holdings.holdings(&[]).await?;
        info!("Fetched {} holdings", holdings.len());

        let Some(quotes) = self.quotes else {
            return Ok(holdings.iter().map(EnrichedHolding::bare).collect());
        };

        let mut rows = Vec::with_capacity(holdings.len());
        for holding in &holdings {
            rows.push(enrich(quotes, holding).await);
        }
        Ok(rows)
    }

    pub async fn top_coins(&self, limit: u32, convert: &str) -> Vec<TopCoin> {
        let Some(quotes) = self.quotes else {
            return Vec::new();
        };

        match quotes.top_listings(limit, convert).await {
            Ok(top) => top,
            Err(e) => {
                warn!("Top listings unavailable: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn build_snapshot(
        &self,
        now: DateTime<Utc>,
        top_limit: u32,
        convert: &str,
    ) -> Result<Snapshot, PortfolioError> {
        let rows = self.enriched_holdings().await?;
        let top = self.top_coins(top_limit, convert).await;
        Ok(Snapshot::new(now, rows, top))
    }
}

async fn enrich(quotes: &dyn QuoteProvider, holding: &Holding) -> EnrichedHolding {
    let mut row = EnrichedHolding::bare(holding);

    match quotes.latest_quote(&holding.asset_code).await {
        Ok(quote) => {
            row.value_usd = row.quantity.to_f64().map(|qty| qty * quote.price);
            row.dilution_ratio = dilution_ratio(quote.market_cap, quote.fully_diluted_market_cap);
            row.dilution_flag = is_dilution_flagged(row.dilution_ratio);
            debug!("{}: price {} value {:?}", row.symbol, quote.price, row.value_usd);
            row.usd_quote = Some(quote);
        }
        Err(e) => {
            warn!("Quote lookup failed for {}: {}", holding.asset_code, e);
            row.quote_error = Some(e.to_string());
        }
    }

    row
}

/// Plain-text holdings table followed by a totals line.
pub fn render_text(rows: &[EnrichedHolding]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("No holdings.\n");
        return out;
    }

    let quoted = rows.iter().any(|r| r.usd_quote.is_some());
    if !quoted {
        let _ = writeln!(out, "{:<10} {:>20}", "ASSET", "QUANTITY");
        for row in rows {
            let _ = writeln!(out, "{:<10} {:>20}", row.symbol, row.quantity.normalize());
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:>18} {:>14} {:>14} {:>8} {:>9}",
        "ASSET", "QUANTITY", "PRICE USD", "VALUE USD", "24H %", "FDV/MC"
    );
    for row in rows {
        let price = row.usd_quote.as_ref().map(|q| q.price);
        let change = row.usd_quote.as_ref().and_then(|q| q.percent_change_24h);
        let ratio = match row.dilution_ratio {
            Some(r) if row.dilution_flag => format!("{:.2}!", r),
            Some(r) => format!("{:.2}", r),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<10} {:>18} {:>14} {:>14} {:>8} {:>9}",
            row.symbol,
            row.quantity.normalize(),
            fmt_opt(price, 4),
            fmt_opt(row.value_usd, 2),
            fmt_opt(change, 2),
            ratio
        );
        if let Some(err) = &row.quote_error {
            let _ = writeln!(out, "  ! {}", err);
        }
    }

    let summary = PortfolioSummary::from_rows(rows, 0);
    let _ = writeln!(
        out,
        "\nTotal: ${:.2} ({} priced, {} unpriced, {} dilution flags)",
        summary.total_value_usd, summary.priced_count, summary.unpriced_count, summary.dilution_flags
    );
    out
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}
