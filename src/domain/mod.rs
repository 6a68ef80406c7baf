// Uniform brokerage error payload
pub mod envelope;

// Domain-specific error types
pub mod errors;

// Token dilution signal
pub mod dilution;

// Quotes, listings and OHLCV
pub mod market;

// Order request types
pub mod orders;

// Holdings and enriched rows
pub mod portfolio;

// Port interfaces
pub mod ports;

// Daily snapshot document
pub mod snapshot;
