//! Typed dataset and publication records
//!
//! Parsing is done elsewhere; this module turns the flat header-to-cell
//! mapping produced by the parser into fixed-schema records with typed
//! accessors for the multi-valued fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod display;

pub use display::{language_name, license_spdx};

/// A parsed row: header name to cell text, in header order.
pub type RawRecord = IndexMap<String, String>;

/// Named attributes of a dataset record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Code,
    Name,
    Description,
    Year,
    Size,
    License,
    ArtifactType,
    Granularity,
    ReStage,
    Task,
    Domain,
    Languages,
    Labels,
    Extends,
    Publications,
    Url,
    Reference,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Code,
        Field::Name,
        Field::Description,
        Field::Year,
        Field::Size,
        Field::License,
        Field::ArtifactType,
        Field::Granularity,
        Field::ReStage,
        Field::Task,
        Field::Domain,
        Field::Languages,
        Field::Labels,
        Field::Extends,
        Field::Publications,
        Field::Url,
        Field::Reference,
    ];

    /// Column header used by the catalog file
    pub fn header(&self) -> &'static str {
        match self {
            Field::Code => "Code",
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Year => "Year",
            Field::Size => "Size",
            Field::License => "License",
            Field::ArtifactType => "Artifact type",
            Field::Granularity => "Granularity",
            Field::ReStage => "RE stage",
            Field::Task => "Task",
            Field::Domain => "Domain",
            Field::Languages => "Languages",
            Field::Labels => "Labels",
            Field::Extends => "Extends",
            Field::Publications => "Publications",
            Field::Url => "URL",
            Field::Reference => "Reference",
        }
    }
}

/// One dataset catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub code: String,
    pub name: String,
    pub description: String,
    pub year: String,
    pub size: String,
    pub license: String,
    pub artifact_type: String,
    pub granularity: String,
    pub re_stage: String,
    pub task: String,
    pub domain: String,
    pub languages: String,
    pub labels: String,
    pub extends: String,
    pub publications: String,
    pub url: String,
    pub reference: String,
}

impl Record {
    /// Build a record from a parsed row. Missing columns become empty strings.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let get = |field: Field| raw.get(field.header()).cloned().unwrap_or_default();

        Self {
            code: get(Field::Code).trim().to_string(),
            name: get(Field::Name),
            description: get(Field::Description),
            year: get(Field::Year),
            size: get(Field::Size),
            license: get(Field::License),
            artifact_type: get(Field::ArtifactType),
            granularity: get(Field::Granularity),
            re_stage: get(Field::ReStage),
            task: get(Field::Task),
            domain: get(Field::Domain),
            languages: get(Field::Languages),
            labels: get(Field::Labels),
            extends: get(Field::Extends),
            publications: get(Field::Publications),
            url: get(Field::Url),
            reference: get(Field::Reference),
        }
    }

    /// Raw value of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Code => &self.code,
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Year => &self.year,
            Field::Size => &self.size,
            Field::License => &self.license,
            Field::ArtifactType => &self.artifact_type,
            Field::Granularity => &self.granularity,
            Field::ReStage => &self.re_stage,
            Field::Task => &self.task,
            Field::Domain => &self.domain,
            Field::Languages => &self.languages,
            Field::Labels => &self.labels,
            Field::Extends => &self.extends,
            Field::Publications => &self.publications,
            Field::Url => &self.url,
            Field::Reference => &self.reference,
        }
    }

    pub fn domains(&self) -> Vec<&str> {
        split_list(&self.domain)
    }

    pub fn language_codes(&self) -> Vec<&str> {
        split_list(&self.languages)
    }

    /// Label groups: `;` separates groups, `,` separates labels inside a group.
    pub fn label_groups(&self) -> Vec<Vec<&str>> {
        if is_absent(&self.labels) {
            return Vec::new();
        }
        self.labels
            .split(';')
            .map(split_list)
            .filter(|group| !group.is_empty())
            .collect()
    }

    /// Codes of the records this one extends
    pub fn extends_codes(&self) -> Vec<&str> {
        if is_absent(&self.extends) {
            return Vec::new();
        }
        split_list(&self.extends)
    }

    /// Foreign keys into the publication set
    pub fn publication_ids(&self) -> Vec<&str> {
        if is_absent(&self.publications) {
            return Vec::new();
        }
        split_list(&self.publications)
    }

    pub fn year_value(&self) -> i64 {
        parse_number(&self.year)
    }

    pub fn size_value(&self) -> i64 {
        parse_number(&self.size)
    }

    /// Text the free-text search runs against.
    ///
    /// Fields are joined with a single space, so a needle spanning the end of
    /// one field and the start of the next can still match.
    pub fn searchable_text(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.domain.as_str(),
            self.task.as_str(),
            self.labels.as_str(),
        ]
        .join(" ")
    }
}

/// Secondary record joined into a dataset's detail view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub source_title: String,
    pub doi: String,
    pub abstract_text: String,
}

impl Publication {
    pub fn from_raw(raw: &RawRecord) -> Self {
        let get = |key: &str| raw.get(key).cloned().unwrap_or_default();

        Self {
            id: get("ID").trim().to_string(),
            title: get("Title"),
            authors: get("Authors"),
            year: get("Year"),
            source_title: get("Source title"),
            doi: get("DOI"),
            abstract_text: get("Abstract"),
        }
    }
}

/// Split a comma-separated cell into trimmed, non-empty parts.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// A blank cell or a lone `-` means "no value".
pub fn is_absent(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "-"
}

/// Integer value of a numeric cell; missing or non-numeric cells count as 0.
pub fn parse_number(value: &str) -> i64 {
    value.trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_raw_defaults_missing_columns() {
        let record = Record::from_raw(&raw(&[("Code", " D003 "), ("Name", "PURE")]));
        assert_eq!(record.code, "D003");
        assert_eq!(record.name, "PURE");
        assert_eq!(record.license, "");
        assert_eq!(record.get(Field::ArtifactType), "");
    }

    #[test]
    fn test_multi_valued_fields_are_trimmed() {
        let record = Record {
            domain: " NLP ,Safety,, ".into(),
            languages: "en, zh".into(),
            ..Default::default()
        };
        assert_eq!(record.domains(), vec!["NLP", "Safety"]);
        assert_eq!(record.language_codes(), vec!["en", "zh"]);
    }

    #[test]
    fn test_label_groups() {
        let record = Record {
            labels: "functional, non-functional; usability ,security;".into(),
            ..Default::default()
        };
        assert_eq!(
            record.label_groups(),
            vec![vec!["functional", "non-functional"], vec!["usability", "security"]]
        );

        let dash = Record {
            labels: " - ".into(),
            ..Default::default()
        };
        assert!(dash.label_groups().is_empty());
    }

    #[test]
    fn test_extends_dash_means_none() {
        let record = Record {
            extends: "-".into(),
            ..Default::default()
        };
        assert!(record.extends_codes().is_empty());

        let record = Record {
            extends: "D001, D002".into(),
            ..Default::default()
        };
        assert_eq!(record.extends_codes(), vec!["D001", "D002"]);
    }

    #[test]
    fn test_numeric_fields_fall_back_to_zero() {
        let record = Record {
            year: "2021".into(),
            size: "n/a".into(),
            ..Default::default()
        };
        assert_eq!(record.year_value(), 2021);
        assert_eq!(record.size_value(), 0);
    }

    #[test]
    fn test_searchable_text_joins_with_space() {
        let record = Record {
            name: "Alpha".into(),
            description: "desc".into(),
            domain: "NLP".into(),
            task: "Classification".into(),
            labels: "x".into(),
            ..Default::default()
        };
        assert_eq!(record.searchable_text(), "Alpha desc NLP Classification x");
    }

    #[test]
    fn test_publication_from_raw() {
        let publication = Publication::from_raw(&raw(&[
            ("ID", "P1"),
            ("Title", "A study"),
            ("Source title", "RE'21"),
        ]));
        assert_eq!(publication.id, "P1");
        assert_eq!(publication.source_title, "RE'21");
        assert_eq!(publication.doi, "");
    }
}
