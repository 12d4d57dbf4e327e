//! Search and attribute filters over the record set

use serde::{Deserialize, Serialize};

use crate::record::{split_list, Field, Record};

/// Attributes the listing can be filtered by, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterAttribute {
    License,
    ArtifactType,
    Granularity,
    ReStage,
    Task,
    Domain,
    Languages,
    Year,
}

impl FilterAttribute {
    pub const ALL: [FilterAttribute; 8] = [
        FilterAttribute::License,
        FilterAttribute::ArtifactType,
        FilterAttribute::Granularity,
        FilterAttribute::ReStage,
        FilterAttribute::Task,
        FilterAttribute::Domain,
        FilterAttribute::Languages,
        FilterAttribute::Year,
    ];

    /// Record field the filter looks at
    pub fn field(&self) -> Field {
        match self {
            FilterAttribute::License => Field::License,
            FilterAttribute::ArtifactType => Field::ArtifactType,
            FilterAttribute::Granularity => Field::Granularity,
            FilterAttribute::ReStage => Field::ReStage,
            FilterAttribute::Task => Field::Task,
            FilterAttribute::Domain => Field::Domain,
            FilterAttribute::Languages => Field::Languages,
            FilterAttribute::Year => Field::Year,
        }
    }

    /// Name of the URL query parameter
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterAttribute::License => "license",
            FilterAttribute::ArtifactType => "artifact",
            FilterAttribute::Granularity => "granularity",
            FilterAttribute::ReStage => "stage",
            FilterAttribute::Task => "task",
            FilterAttribute::Domain => "domain",
            FilterAttribute::Languages => "language",
            FilterAttribute::Year => "year",
        }
    }

    pub fn from_param_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.param_name() == name)
    }

    /// Whether the raw value holds several comma-separated values
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, FilterAttribute::Domain | FilterAttribute::Languages)
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Check a record against a selected value
    pub fn matches(&self, record: &Record, selected: &str) -> bool {
        let raw = record.get(self.field());
        if self.is_multi_valued() {
            split_list(raw).contains(&selected)
        } else {
            raw == selected
        }
    }
}

/// One optional selection per filter attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelections {
    values: [Option<String>; 8],
}

impl FilterSelections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: FilterAttribute) -> Option<&str> {
        self.values[attr.index()].as_deref()
    }

    /// Select a value; a blank value unsets the filter.
    pub fn set(&mut self, attr: FilterAttribute, value: Option<String>) {
        self.values[attr.index()] = value.filter(|v| !v.trim().is_empty());
    }

    pub fn with(mut self, attr: FilterAttribute, value: impl Into<String>) -> Self {
        self.set(attr, Some(value.into()));
        self
    }

    pub fn clear(&mut self) {
        self.values = Default::default();
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Active selections in attribute order
    pub fn active(&self) -> impl Iterator<Item = (FilterAttribute, &str)> + '_ {
        FilterAttribute::ALL
            .into_iter()
            .filter_map(|attr| self.get(attr).map(|value| (attr, value)))
    }
}

/// Free-text search plus attribute filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub search: String,
    pub filters: FilterSelections,
}

impl Query {
    pub fn new(search: impl Into<String>, filters: FilterSelections) -> Self {
        Self {
            search: search.into(),
            filters,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.filters.is_empty()
    }

    /// Whether a record passes the search and every active filter
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record)
            && self
                .filters
                .active()
                .all(|(attr, value)| attr.matches(record, value))
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        record
            .searchable_text()
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Matching records, in input order
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Positions of matching records, in input order
    pub fn apply_indices(&self, records: &[Record]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(idx, _)| idx)
            .collect()
    }
}
