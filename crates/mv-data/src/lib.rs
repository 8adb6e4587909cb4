//! Dataset loading and per-row enrichment for the meteorite explorer

pub mod cache;
pub mod config;
pub mod enrich;
pub mod loader;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use cache::LookupCache;
pub use config::ExplorerConfig;
pub use enrich::{CountryLookup, EnrichmentGuard, EnrichmentService, GeoapifyGeocoder, ReverseGeocoder};
pub use loader::{decode_records, load_dataset};
pub use sources::{DataSource, HttpSource, JsonFileSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}
