pub mod coinmarketcap;
pub mod core;
pub mod mock;
pub mod persistence;
pub mod robinhood;

pub use coinmarketcap::CoinMarketCapClient;
pub use persistence::{SnapshotOutcome, SnapshotStore};
pub use robinhood::RobinhoodClient;
