use crate::domain::envelope::ErrorEnvelope;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when required configuration is absent or unusable
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{names} are required. Set them in the environment or a .env file")]
    MissingCredential { names: &'static str },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Errors related to key material
#[derive(Debug, Error)]
pub enum DecodingError {
    #[error("Private key is not valid base64: {source}")]
    Base64 {
        #[from]
        source: base64::DecodeError,
    },

    #[error("Private key seed must be {expected} bytes, got {actual}")]
    SeedLength { expected: usize, actual: usize },
}

/// Brokerage client failures that are not transport failures.
///
/// Transport failures are returned to the caller as a `client_error` payload
/// instead, see [`ErrorEnvelope`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {reason}")]
    HttpClient { reason: String },
}

/// An expected field was absent from a response payload
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("Missing field `{field}` in payload: {payload}")]
    MissingField { field: String, payload: String },

    #[error("Invalid number in `{field}`: {value}")]
    InvalidNumber { field: String, value: String },
}

/// Errors from the quote vendor (CoinMarketCap)
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Request failed: {reason}")]
    Transport { reason: String },

    #[error("CMC API error {code}: {message}")]
    Vendor { code: i64, message: String },

    #[error("CMC API returned status {status}")]
    Http { status: u16 },

    #[error("No quote data for {symbol}")]
    UnknownSymbol { symbol: String },

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

impl QuoteError {
    /// Failures worth another attempt: the request itself failed or the
    /// vendor refused it. Malformed payloads and unknown symbols are final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QuoteError::Transport { .. } | QuoteError::Http { .. } | QuoteError::Vendor { .. }
        )
    }
}

/// Errors raised while reading a price from best-bid-ask data
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Price lookup for {symbol} failed: {envelope}")]
    Client {
        symbol: String,
        envelope: ErrorEnvelope,
    },

    #[error("Could not parse price for {symbol}: {source}")]
    Parsing {
        symbol: String,
        #[source]
        source: ParsingError,
    },

    #[error(transparent)]
    Request(#[from] ClientError),
}

/// Errors related to holdings retrieval
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Holdings request failed: {0}")]
    Transport(ErrorEnvelope),

    #[error("Holdings request rejected: {0}")]
    Api(ErrorEnvelope),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

/// Errors related to snapshot persistence
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No snapshot stored at {path:?}")]
    NotFound { path: PathBuf },
}
