//! Snapshot configuration parsing from environment variables.
//!
//! This module handles where daily snapshots are written and how much
//! market context they carry.

use super::{Lookup, parse_or};
use std::path::PathBuf;

/// Snapshot environment configuration
#[derive(Debug, Clone)]
pub struct SnapshotEnvConfig {
    pub log_dir: PathBuf,
    pub top_listings_limit: u32,
    pub convert: String,
}

impl Default for SnapshotEnvConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            top_listings_limit: 50,
            convert: "USD".to_string(),
        }
    }
}

impl SnapshotEnvConfig {
    pub(crate) fn from_lookup(lookup: &Lookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            log_dir: lookup("SNAPSHOT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            top_listings_limit: parse_or(lookup, "SNAPSHOT_TOP_LIMIT", defaults.top_listings_limit),
            convert: lookup("SNAPSHOT_CONVERT")
                .map(|c| c.to_uppercase())
                .unwrap_or(defaults.convert),
        }
    }
}
