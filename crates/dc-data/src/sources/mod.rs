//! Catalog resource sources

pub mod csv_source;

use async_trait::async_trait;
use dc_core::RawRecord;

use crate::DataError;

pub use csv_source::CsvCatalogSource;

/// Provides the raw rows of both catalog resources
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human readable name of the dataset resource, used in errors
    fn datasets_name(&self) -> String;

    /// Human readable name of the publication resource, if one is configured
    fn publications_name(&self) -> Option<String>;

    /// Rows of the dataset resource
    async fn load_datasets(&self) -> Result<Vec<RawRecord>, DataError>;

    /// Rows of the publication resource. `Ok(None)` when none is configured.
    async fn load_publications(&self) -> Result<Option<Vec<RawRecord>>, DataError>;
}
