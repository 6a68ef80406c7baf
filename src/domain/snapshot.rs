use crate::domain::market::TopCoin;
use crate::domain::portfolio::{EnrichedHolding, PortfolioSummary};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Portfolio and market state for one UTC calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub generated_at_iso: String,
    pub holdings: Vec<EnrichedHolding>,
    pub top_coins: Vec<TopCoin>,
    pub summary: PortfolioSummary,
}

impl Snapshot {
    pub fn new(now: DateTime<Utc>, holdings: Vec<EnrichedHolding>, top_coins: Vec<TopCoin>) -> Self {
        let summary = PortfolioSummary::from_rows(&holdings, top_coins.len());
        Self {
            date: now.date_naive(),
            generated_at_iso: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            holdings,
            top_coins,
            summary,
        }
    }
}
