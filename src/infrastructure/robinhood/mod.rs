pub mod client;
pub mod keys;
pub mod models;
pub mod pricing;
pub mod signer;

pub use client::RobinhoodClient;
pub use keys::{KeyPair, generate_keypair, public_key_for};
pub use pricing::get_price;
pub use signer::{AuthHeaders, RequestSigner, sign_message};
