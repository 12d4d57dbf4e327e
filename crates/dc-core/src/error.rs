//! Error taxonomy for the catalog engine

use thiserror::Error;

/// Errors and recoverable conditions raised while loading or browsing a catalog.
///
/// Only [`CatalogError::LoadFailure`] is fatal. The other variants describe
/// conditions that callers recover from locally (an empty publication set,
/// a fallback to the listing view, padded rows) and are mostly logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("failed to load {resource}: {reason}")]
    LoadFailure { resource: String, reason: String },

    #[error("optional resource {resource} is unavailable")]
    OptionalResourceMissing { resource: String },

    #[error("no record with code '{code}'")]
    RecordNotFound { code: String },

    #[error("row {line} has {found} cells, expected {expected}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl CatalogError {
    pub fn load_failure(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::LoadFailure {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::RecordNotFound { code: code.into() }
    }

    /// Whether the error blocks all interaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoadFailure { .. })
    }
}
