//! Detail view assembly: publications and cross references joined to a record

use std::borrow::Cow;

use super::CatalogStore;
use crate::record::{language_name, Publication, Record};

/// A same-type reference by `Code`, resolved when the code is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub code: &'a str,
    pub target: Option<&'a Record>,
}

impl Reference<'_> {
    /// Unresolved references are shown as text, not links
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct RecordDetail<'a> {
    pub record: &'a Record,
    pub publications: Vec<&'a Publication>,
    pub extends: Vec<Reference<'a>>,
    pub extended_by: Vec<&'a Record>,
    pub languages: Vec<Cow<'a, str>>,
    pub label_groups: Vec<Vec<&'a str>>,
}

impl<'a> RecordDetail<'a> {
    pub(super) fn assemble(store: &'a CatalogStore, record: &'a Record) -> Self {
        let publications = record
            .publication_ids()
            .into_iter()
            .filter_map(|id| store.find_publication(id))
            .collect();

        let extends = record
            .extends_codes()
            .into_iter()
            .map(|code| Reference {
                code,
                target: store.find_by_code(code),
            })
            .collect();

        let extended_by = store
            .all()
            .iter()
            .filter(|other| other.code != record.code)
            .filter(|other| other.extends_codes().contains(&record.code.as_str()))
            .collect();

        Self {
            record,
            publications,
            extends,
            extended_by,
            languages: record.language_codes().into_iter().map(language_name).collect(),
            label_groups: record.label_groups(),
        }
    }
}
