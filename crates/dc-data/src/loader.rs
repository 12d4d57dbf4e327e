//! Startup loading of both catalog resources

use dc_core::{CatalogError, CatalogStore};
use tracing::{info, warn};

use crate::sources::CatalogSource;
use crate::DataError;

/// Outcome of a successful load
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: CatalogStore,
    /// False when the publication resource was missing or unreadable
    pub publications_available: bool,
}

/// Fetch both resources concurrently and build the store.
///
/// Failing to load the datasets is fatal. A publication resource that is
/// not configured, missing or unreadable leaves the catalog without
/// publications and the session still starts.
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<LoadedCatalog, DataError> {
    let (datasets, publications) = tokio::join!(source.load_datasets(), source.load_publications());

    let datasets = datasets.map_err(|err| CatalogError::load_failure(source.datasets_name(), err))?;

    let (publications, publications_available) = match publications {
        Ok(Some(rows)) => (rows, true),
        Ok(None) => (Vec::new(), false),
        Err(err) => {
            let missing = CatalogError::OptionalResourceMissing {
                resource: source.publications_name().unwrap_or_default(),
            };
            warn!(error = %missing, reason = %err, "continuing without publications");
            (Vec::new(), false)
        }
    };

    let catalog = CatalogStore::load(&datasets, &publications);
    info!(
        datasets = catalog.len(),
        publications = catalog.publications().len(),
        "catalog ready"
    );

    Ok(LoadedCatalog {
        catalog,
        publications_available,
    })
}
