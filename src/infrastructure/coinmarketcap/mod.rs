pub mod client;
pub mod models;
pub mod transport;

pub use client::CoinMarketCapClient;
pub use transport::{HttpVendorTransport, VendorTransport};
