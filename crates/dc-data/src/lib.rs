//! Catalog ingestion: delimited-text parsing, startup loading and configuration

pub mod config;
pub mod loader;
pub mod sources;

use dc_core::CatalogError;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use config::CatalogConfig;
pub use loader::{load_catalog, LoadedCatalog};
pub use sources::{CatalogSource, CsvCatalogSource};

/// Errors that can occur while loading catalog resources
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl DataError {
    /// Whether the error should stop startup
    pub fn is_fatal(&self) -> bool {
        match self {
            DataError::Catalog(err) => err.is_fatal(),
            _ => true,
        }
    }
}
