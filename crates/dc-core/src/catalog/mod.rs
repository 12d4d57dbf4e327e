//! Catalog store: the immutable record set and its current derived view

mod detail;

use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::query::{FilterAttribute, Query};
use crate::record::{split_list, Publication, RawRecord, Record};
use crate::sort::SortSpec;

pub use detail::{RecordDetail, Reference};

/// Loaded catalog plus the filtered and sorted view the listing shows
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<Record>,
    publications: Vec<Publication>,
    /// Code -> position in `records`
    by_code: AHashMap<String, usize>,
    /// Publication ID -> position in `publications`
    by_publication_id: AHashMap<String, usize>,
    /// Positions into `records`, in display order
    view: Vec<usize>,
}

impl CatalogStore {
    /// Build a store from parsed rows.
    ///
    /// Rows without a `Code` are dropped, and only the first row for a
    /// given `Code` is kept, so codes stay unique and routable.
    pub fn load(raw_records: &[RawRecord], raw_publications: &[RawRecord]) -> Self {
        let mut records = Vec::with_capacity(raw_records.len());
        let mut by_code = AHashMap::with_capacity(raw_records.len());

        for (row, raw) in raw_records.iter().enumerate() {
            let record = Record::from_raw(raw);
            if record.code.is_empty() {
                warn!(row, "skipping dataset row without a code");
                continue;
            }
            if by_code.contains_key(&record.code) {
                warn!(row, code = %record.code, "skipping dataset row with duplicate code");
                continue;
            }
            by_code.insert(record.code.clone(), records.len());
            records.push(record);
        }

        let publications: Vec<Publication> =
            raw_publications.iter().map(Publication::from_raw).collect();
        let mut by_publication_id = AHashMap::with_capacity(publications.len());
        for (idx, publication) in publications.iter().enumerate() {
            by_publication_id.entry(publication.id.clone()).or_insert(idx);
        }

        debug!(
            records = records.len(),
            publications = publications.len(),
            "catalog loaded"
        );

        let view = (0..records.len()).collect();
        Self {
            records,
            publications,
            by_code,
            by_publication_id,
            view,
        }
    }

    /// Build a store from already typed records
    pub fn from_records(records: Vec<Record>, publications: Vec<Publication>) -> Self {
        let to_raw = |record: &Record| -> RawRecord {
            crate::record::Field::ALL
                .iter()
                .map(|field| (field.header().to_string(), record.get(*field).to_string()))
                .collect()
        };
        let raw: Vec<RawRecord> = records.iter().map(to_raw).collect();
        let mut store = Self::load(&raw, &[]);
        store.set_publications(publications);
        store
    }

    fn set_publications(&mut self, publications: Vec<Publication>) {
        self.by_publication_id.clear();
        for (idx, publication) in publications.iter().enumerate() {
            self.by_publication_id
                .entry(publication.id.clone())
                .or_insert(idx);
        }
        self.publications = publications;
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The current view: records that passed the query, in sort order
    pub fn filtered(&self) -> Vec<&Record> {
        self.view.iter().map(|&idx| &self.records[idx]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Re-derive the view from a query and sort order
    pub fn refresh(&mut self, query: &Query, sort: &SortSpec) {
        let mut view = query.apply_indices(&self.records);
        sort.sort_indices(&self.records, &mut view);
        debug!(visible = view.len(), total = self.records.len(), "view refreshed");
        self.view = view;
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Record> {
        self.by_code.get(code).map(|&idx| &self.records[idx])
    }

    /// Like [`find_by_code`](Self::find_by_code) but reports a missing code as an error
    pub fn require(&self, code: &str) -> Result<&Record, CatalogError> {
        self.find_by_code(code)
            .ok_or_else(|| CatalogError::not_found(code))
    }

    pub fn find_publication(&self, id: &str) -> Option<&Publication> {
        self.by_publication_id
            .get(id)
            .map(|&idx| &self.publications[idx])
    }

    /// Everything the detail view shows for one record
    pub fn detail(&self, code: &str) -> Option<RecordDetail<'_>> {
        let record = self.find_by_code(code)?;
        Some(RecordDetail::assemble(self, record))
    }

    /// Distinct values present for a filter attribute.
    ///
    /// Multi-valued attributes contribute each of their parts. Values are
    /// ordered case-insensitively, except years which come newest first.
    pub fn facet_values(&self, attr: FilterAttribute) -> Vec<String> {
        let mut seen = AHashSet::new();
        let mut values = Vec::new();

        for record in &self.records {
            let raw = record.get(attr.field());
            let parts = if attr.is_multi_valued() {
                split_list(raw)
            } else if raw.trim().is_empty() {
                Vec::new()
            } else {
                vec![raw]
            };
            for part in parts {
                if seen.insert(part) {
                    values.push(part.to_string());
                }
            }
        }

        if attr == FilterAttribute::Year {
            values.sort_by(|a, b| {
                crate::record::parse_number(b)
                    .cmp(&crate::record::parse_number(a))
                    .then_with(|| b.cmp(a))
            });
        } else {
            values.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterSelections;
    use crate::sort::{SortDirection, SortKey};
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store() -> CatalogStore {
        CatalogStore::load(
            &[
                raw(&[("Code", "A1"), ("Name", "Alpha"), ("Year", "2020"), ("Domain", "NLP, Safety")]),
                raw(&[("Code", "B2"), ("Name", "Beta"), ("Year", "2022"), ("Domain", "NLP")]),
            ],
            &[],
        )
    }

    fn codes(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.code.clone()).collect()
    }

    #[test]
    fn test_load_keeps_order_and_indexes_codes() {
        let store = store();
        assert_eq!(store.len(), 2);
        assert_eq!(codes(&store.filtered()), vec!["A1", "B2"]);
        assert_eq!(store.find_by_code("B2").map(|r| r.name.as_str()), Some("Beta"));
        assert!(store.find_by_code("Unknown999").is_none());
        assert_eq!(
            store.require("Unknown999").unwrap_err(),
            CatalogError::not_found("Unknown999")
        );
    }

    #[test]
    fn test_load_drops_blank_and_duplicate_codes() {
        let store = CatalogStore::load(
            &[
                raw(&[("Code", "A1"), ("Name", "first")]),
                raw(&[("Code", ""), ("Name", "no code")]),
                raw(&[("Code", "A1"), ("Name", "second")]),
            ],
            &[],
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_code("A1").map(|r| r.name.as_str()), Some("first"));
    }

    #[test]
    fn test_refresh_filters_then_sorts() {
        let mut store = store();
        let query = Query::new("", FilterSelections::new().with(FilterAttribute::Domain, "NLP"));
        store.refresh(&query, &SortSpec::new(SortKey::Year, SortDirection::Descending));
        assert_eq!(codes(&store.filtered()), vec!["B2", "A1"]);

        let query = Query::new("", FilterSelections::new().with(FilterAttribute::Domain, "Safety"));
        store.refresh(&query, &SortSpec::default());
        assert_eq!(codes(&store.filtered()), vec!["A1"]);
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_facet_values() {
        let store = store();
        assert_eq!(store.facet_values(FilterAttribute::Domain), vec!["NLP", "Safety"]);
        assert_eq!(store.facet_values(FilterAttribute::Year), vec!["2022", "2020"]);
        assert!(store.facet_values(FilterAttribute::License).is_empty());
    }

    #[test]
    fn test_from_records_round_trips_fields() {
        let record = Record {
            code: "C3".into(),
            name: "Gamma".into(),
            artifact_type: "Requirements".into(),
            ..Default::default()
        };
        let store = CatalogStore::from_records(
            vec![record.clone()],
            vec![Publication {
                id: "P1".into(),
                ..Default::default()
            }],
        );
        assert_eq!(store.find_by_code("C3"), Some(&record));
        assert!(store.find_publication("P1").is_some());
    }
}
