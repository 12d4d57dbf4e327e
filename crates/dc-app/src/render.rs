//! Plain text rendering of the listing, detail and facet views

use std::io::{self, Write};

use dc_core::record::license_spdx;
use dc_core::{CatalogStore, FilterAttribute, ListingState, Record, RecordDetail, Route, Session, UrlCodec, ViewState};

/// Whatever the session's route shows
pub fn write_view(out: &mut impl Write, session: &Session) -> io::Result<()> {
    match session.detail() {
        Some(detail) => write_detail(out, &detail, session.router().codec(), session.listing()),
        None => write_listing(out, session),
    }
}

/// Listing header plus one line per visible record
pub fn write_listing(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let catalog = session.catalog();
    writeln!(out, "{} of {} datasets  {}", catalog.filtered_len(), catalog.len(), session.href())?;

    let listing = session.listing();
    for (attr, value) in listing.filters().active() {
        writeln!(out, "  {}: {}", attr.param_name(), value)?;
    }
    if !listing.search().is_empty() {
        writeln!(out, "  search: {}", listing.search())?;
    }

    for record in session.visible() {
        write_row(out, record)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, record: &Record) -> io::Result<()> {
    let year = if record.year.trim().is_empty() { "-" } else { record.year.trim() };
    write!(out, "{:<14} {:>4}  {}", record.code, year, record.name)?;
    if !record.domain.trim().is_empty() {
        write!(out, "  [{}]", record.domain.trim())?;
    }
    writeln!(out)
}

/// Detail view of one record. Links keep the listing state they came from.
pub fn write_detail(out: &mut impl Write, detail: &RecordDetail<'_>, codec: &UrlCodec, listing: &ListingState) -> io::Result<()> {
    let record = detail.record;
    writeln!(out, "{} ({})", record.name, record.code)?;
    if !record.description.trim().is_empty() {
        writeln!(out, "\n{}\n", record.description.trim())?;
    }

    let license = if record.license.trim().is_empty() {
        String::new()
    } else {
        format!("{} ({})", record.license.trim(), license_spdx(&record.license))
    };
    let languages = detail.languages.join(", ");
    let fields = [
        ("Year", record.year.as_str()),
        ("Size", record.size.as_str()),
        ("License", license.as_str()),
        ("Type", record.artifact_type.as_str()),
        ("Granularity", record.granularity.as_str()),
        ("Stage", record.re_stage.as_str()),
        ("Task", record.task.as_str()),
        ("Domain", record.domain.as_str()),
        ("Languages", languages.as_str()),
        ("URL", record.url.as_str()),
    ];
    for (label, value) in fields {
        if !value.trim().is_empty() {
            writeln!(out, "{:<12} {}", label, value.trim())?;
        }
    }

    if !detail.label_groups.is_empty() {
        writeln!(out, "Labels")?;
        for group in &detail.label_groups {
            writeln!(out, "  {}", group.join(" / "))?;
        }
    }

    if !detail.extends.is_empty() {
        writeln!(out, "Extends")?;
        for reference in &detail.extends {
            match reference.target {
                Some(target) => writeln!(out, "  {} {}", target.name, detail_href(codec, &target.code, listing))?,
                None => writeln!(out, "  {}", reference.code)?,
            }
        }
    }

    if !detail.extended_by.is_empty() {
        writeln!(out, "Extended by")?;
        for other in &detail.extended_by {
            writeln!(out, "  {} {}", other.name, detail_href(codec, &other.code, listing))?;
        }
    }

    if !detail.publications.is_empty() {
        writeln!(out, "Publications")?;
        for publication in &detail.publications {
            write!(out, "  {}", publication.title)?;
            if !publication.year.trim().is_empty() {
                write!(out, " ({})", publication.year.trim())?;
            }
            writeln!(out)?;
            if !publication.authors.trim().is_empty() {
                writeln!(out, "    {}", publication.authors.trim())?;
            }
            if !publication.doi.trim().is_empty() {
                writeln!(out, "    doi:{}", publication.doi.trim())?;
            }
        }
    }

    writeln!(out, "\nback: {}", codec.encode(&ViewState { route: Route::Listing, listing: listing.clone() }))
}

fn detail_href(codec: &UrlCodec, code: &str, listing: &ListingState) -> String {
    codec.encode(&ViewState {
        route: Route::Detail(code.to_string()),
        listing: listing.clone(),
    })
}

/// Distinct values for one attribute, or for all of them
pub fn write_facets(out: &mut impl Write, catalog: &CatalogStore, attr: Option<FilterAttribute>) -> io::Result<()> {
    let attrs: Vec<FilterAttribute> = match attr {
        Some(attr) => vec![attr],
        None => FilterAttribute::ALL.to_vec(),
    };
    for attr in attrs {
        writeln!(out, "{}", attr.param_name())?;
        for value in catalog.facet_values(attr) {
            writeln!(out, "  {}", value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::{Location, Publication};
    use pretty_assertions::assert_eq;

    fn catalog() -> CatalogStore {
        CatalogStore::from_records(
            vec![
                Record {
                    code: "A1".into(),
                    name: "Alpha".into(),
                    year: "2020".into(),
                    domain: "NLP".into(),
                    languages: "en, zh".into(),
                    extends: "B2, Z9".into(),
                    publications: "P1".into(),
                    ..Default::default()
                },
                Record {
                    code: "B2".into(),
                    name: "Beta".into(),
                    ..Default::default()
                },
            ],
            vec![Publication {
                id: "P1".into(),
                title: "On Alpha".into(),
                year: "2021".into(),
                ..Default::default()
            }],
        )
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_rows() {
        let (session, _) = Session::start(catalog(), UrlCodec::default(), &Location::parse("/?domain=NLP"), None);
        let text = render(|out| write_listing(out, &session));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "1 of 2 datasets  /?domain=NLP");
        assert_eq!(lines[1], "  domain: NLP");
        assert!(lines[2].starts_with("A1"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_detail_links_keep_listing_state() {
        let catalog = catalog();
        let codec = UrlCodec::new("/catalog/");
        let listing = codec.decode_listing(&Location::parse("/catalog/?domain=NLP"));
        let detail = catalog.detail("A1").unwrap();

        let text = render(|out| write_detail(out, &detail, &codec, &listing));
        assert!(text.contains("Languages    English, Chinese"));
        assert!(text.contains("  Beta /catalog/B2?domain=NLP"));
        assert!(text.contains("  Z9\n"));
        assert!(text.contains("  On Alpha (2021)"));
        assert!(text.ends_with("back: /catalog/?domain=NLP\n"));
    }

    #[test]
    fn test_single_facet() {
        let text = render(|out| write_facets(out, &catalog(), Some(FilterAttribute::Domain)));
        assert_eq!(text, "domain\n  NLP\n");
    }
}
