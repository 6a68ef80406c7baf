// Holdings enrichment, snapshots and text reports
pub mod portfolio_reporter;

pub use portfolio_reporter::{PortfolioReporter, render_text};
