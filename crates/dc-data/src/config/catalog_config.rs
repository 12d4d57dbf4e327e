//! Configuration for locating and decoding catalog resources

use std::path::{Path, PathBuf};
use std::time::Duration;

use dc_core::location::DEFAULT_STATIC_ASSETS;
use dc_core::UrlCodec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sources::CsvCatalogSource;
use crate::DataError;

/// Where the catalog lives and how the browser is mounted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Delimited text file with one row per dataset
    pub datasets: PathBuf,

    /// Delimited text file with one row per publication. Optional.
    pub publications: Option<PathBuf>,

    /// Column delimiter shared by both files
    pub delimiter: char,

    /// Prefix the browser is served under, e.g. `/catalog/`
    pub base_path: String,

    /// Top-level path segments that are files, never record codes
    pub static_assets: Vec<String>,

    /// Quiet period before typed search text is applied
    pub search_debounce_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            datasets: PathBuf::from("data/datasets.csv"),
            publications: Some(PathBuf::from("data/publications.csv")),
            delimiter: ',',
            base_path: "/".to_string(),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            search_debounce_ms: 300,
        }
    }
}

impl CatalogConfig {
    /// Read a JSON config file. Relative resource paths resolve against
    /// the config file's directory.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: CatalogConfig = serde_json::from_str(&text)?;

        if let Some(dir) = path.parent() {
            config.datasets = resolve(dir, &config.datasets);
            config.publications = config.publications.as_deref().map(|p| resolve(dir, p));
        }

        info!(path = %path.display(), datasets = %config.datasets.display(), "loaded catalog config");
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, DataError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The delimiter as a single byte, as the csv reader wants it
    pub fn delimiter_byte(&self) -> Result<u8, DataError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| DataError::Csv(format!("delimiter {:?} is not a single ASCII character", self.delimiter)))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn codec(&self) -> UrlCodec {
        UrlCodec::new(&self.base_path).with_static_assets(self.static_assets.iter().cloned())
    }

    /// Source reading both configured files
    pub fn source(&self) -> Result<CsvCatalogSource, DataError> {
        Ok(CsvCatalogSource::new(self.datasets.clone(), self.publications.clone())
            .with_delimiter(self.delimiter_byte()?))
    }
}

fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
