//! Mapping between view state and URLs

use tracing::debug;

use super::Location;
use crate::catalog::CatalogStore;
use crate::navigation::Route;
use crate::query::{FilterAttribute, FilterSelections, Query};
use crate::sort::{SortDirection, SortKey, SortSpec};
use crate::state::{ListingState, ViewState};

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_SORT_DIR: &str = "sortDir";

/// Path segments served as static files, never treated as record codes
pub const DEFAULT_STATIC_ASSETS: &[&str] = &["index.html", "404.html", "data", "assets", "css", "js", "images"];

/// Encodes view state into `base_path[code][?query]` and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCodec {
    base_path: String,
    static_assets: Vec<String>,
}

impl Default for UrlCodec {
    fn default() -> Self {
        Self::new("/")
    }
}

impl UrlCodec {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_base(base_path),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_static_assets(mut self, assets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.static_assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Query string for a listing state, without the leading `?`.
    ///
    /// Blank values and default sort settings are left out.
    pub fn encode_query(&self, listing: &ListingState) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();

        if !listing.query.search.trim().is_empty() {
            pairs.push((PARAM_SEARCH, listing.query.search.as_str()));
        }
        for (attr, value) in listing.query.filters.active() {
            pairs.push((attr.param_name(), value));
        }
        if listing.sort.key != SortKey::default() {
            pairs.push((PARAM_SORT, listing.sort.key.as_str()));
        }
        if listing.sort.direction != SortDirection::default() {
            pairs.push((PARAM_SORT_DIR, listing.sort.direction.as_str()));
        }

        pairs
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Href for a view state
    pub fn encode(&self, view: &ViewState) -> String {
        let mut href = self.base_path.clone();
        if let Route::Detail(code) = &view.route {
            href.push_str(&urlencoding::encode(code));
        }
        let query = self.encode_query(&view.listing);
        if !query.is_empty() {
            href.push('?');
            href.push_str(&query);
        }
        href
    }

    /// Listing state from query parameters. Missing or unknown values mean defaults.
    pub fn decode_listing(&self, location: &Location) -> ListingState {
        let mut search = String::new();
        let mut filters = FilterSelections::new();
        // Outer `Some` once the parameter was seen, inner `None` if its value was unknown
        let mut key: Option<Option<SortKey>> = None;
        let mut direction: Option<Option<SortDirection>> = None;

        for (name, value) in location.params() {
            if value.trim().is_empty() {
                continue;
            }
            match name.as_str() {
                PARAM_SEARCH if search.is_empty() => search = value,
                PARAM_SORT if key.is_none() => key = Some(value.parse().ok()),
                PARAM_SORT_DIR if direction.is_none() => direction = Some(value.parse().ok()),
                other => {
                    if let Some(attr) = FilterAttribute::from_param_name(other) {
                        if filters.get(attr).is_none() {
                            filters.set(attr, Some(value));
                        }
                    }
                }
            }
        }

        ListingState {
            query: Query::new(search, filters),
            sort: SortSpec::new(key.flatten().unwrap_or_default(), direction.flatten().unwrap_or_default()),
        }
    }

    /// The record code a path points at, if its shape allows one.
    ///
    /// Only segments after the base path count; static asset names and
    /// anything containing a dot are files, not codes.
    pub fn route_candidate(&self, location: &Location) -> Option<String> {
        let relative = match location.path.strip_prefix(self.base_path.as_str()) {
            Some(rest) => format!("/{}", rest),
            None if location.path == self.base_path.trim_end_matches('/') => return None,
            None => location.path.clone(),
        };
        let segment = Location::new(relative, "").last_segment()?;
        self.is_routable(&segment).then_some(segment)
    }

    /// Whether a code can appear as a path segment and decode back to itself
    pub fn is_routable(&self, code: &str) -> bool {
        !code.is_empty() && !code.contains('.') && !self.static_assets.iter().any(|asset| asset == code)
    }

    /// Resolve a location against the catalog
    pub fn decode_route(&self, location: &Location, catalog: &CatalogStore) -> Route {
        match self.route_candidate(location) {
            Some(code) if catalog.find_by_code(&code).is_some() => Route::Detail(code),
            Some(code) => {
                debug!(%code, path = %location.path, "no record for path, showing listing");
                Route::Listing
            }
            None => Route::Listing,
        }
    }

    pub fn decode(&self, location: &Location, catalog: &CatalogStore) -> ViewState {
        ViewState {
            route: self.decode_route(location, catalog),
            listing: self.decode_listing(location),
        }
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use pretty_assertions::assert_eq;

    fn catalog() -> CatalogStore {
        CatalogStore::from_records(
            vec![
                Record {
                    code: "A1".into(),
                    name: "Alpha".into(),
                    ..Default::default()
                },
                Record {
                    code: "B2".into(),
                    name: "Beta".into(),
                    ..Default::default()
                },
            ],
            Vec::new(),
        )
    }

    fn listing(search: &str, filters: FilterSelections, sort: SortSpec) -> ListingState {
        ListingState {
            query: Query::new(search, filters),
            sort,
        }
    }

    #[test]
    fn test_default_state_encodes_to_base() {
        let codec = UrlCodec::default();
        assert_eq!(codec.encode(&ViewState::default()), "/");
        assert_eq!(UrlCodec::new("repo").encode(&ViewState::default()), "/repo/");
    }

    #[test]
    fn test_only_non_default_values_are_encoded() {
        let codec = UrlCodec::default();
        let state = listing(
            "  ",
            FilterSelections::new()
                .with(FilterAttribute::Domain, "NLP")
                .with(FilterAttribute::ReStage, "Elicitation"),
            SortSpec::new(SortKey::Name, SortDirection::Descending),
        );
        assert_eq!(codec.encode_query(&state), "stage=Elicitation&domain=NLP&sortDir=desc");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let codec = UrlCodec::default();
        let state = listing(
            "über, deep & wide",
            FilterSelections::new().with(FilterAttribute::License, "CC BY 4.0"),
            SortSpec::new(SortKey::Year, SortDirection::Ascending),
        );
        let query = codec.encode_query(&state);
        assert_eq!(
            query,
            "search=%C3%BCber%2C%20deep%20%26%20wide&license=CC%20BY%204.0&sort=year"
        );
        let decoded = codec.decode_listing(&Location::new("/", query));
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_round_trip_listing_and_detail() {
        let codec = UrlCodec::new("/catalog/");
        let catalog = catalog();
        let states = vec![
            ViewState::default(),
            ViewState {
                route: Route::Listing,
                listing: listing(
                    "a+b=c?",
                    FilterSelections::new()
                        .with(FilterAttribute::Languages, "zh")
                        .with(FilterAttribute::Year, "2022"),
                    SortSpec::new(SortKey::Size, SortDirection::Descending),
                ),
            },
            ViewState {
                route: Route::Detail("B2".into()),
                listing: listing("", FilterSelections::new().with(FilterAttribute::Task, "Tracing"), SortSpec::default()),
            },
        ];

        for state in states {
            let href = codec.encode(&state);
            assert_eq!(codec.decode(&Location::parse(&href), &catalog), state, "href {}", href);
        }
    }

    #[test]
    fn test_unknown_params_and_values_use_defaults() {
        let codec = UrlCodec::default();
        let decoded = codec.decode_listing(&Location::parse("/?utm_source=x&sort=title&sortDir=up&domain="));
        assert_eq!(decoded, ListingState::default());
    }

    #[test]
    fn test_blank_search_param_is_absent() {
        let codec = UrlCodec::default();
        let decoded = codec.decode_listing(&Location::parse("/?search=%20%20&search=beta"));
        assert_eq!(decoded.search(), "beta");

        let decoded = codec.decode_listing(&Location::parse("/?search=%20%20"));
        assert!(decoded.is_default());
        assert_eq!(codec.encode_query(&decoded), "");
    }

    #[test]
    fn test_first_sort_param_wins_even_when_unknown() {
        let codec = UrlCodec::default();
        let decoded = codec.decode_listing(&Location::parse("/?sort=title&sort=year&sortDir=up&sortDir=desc"));
        assert_eq!(decoded.sort, SortSpec::default());

        let decoded = codec.decode_listing(&Location::parse("/?sort=year&sort=size"));
        assert_eq!(decoded.sort.key, SortKey::Year);
    }

    #[test]
    fn test_unroutable_codes() {
        let codec = UrlCodec::default();
        assert!(codec.is_routable("D003"));
        assert!(!codec.is_routable("v1.2"));
        assert!(!codec.is_routable("data"));
        assert!(!codec.is_routable(""));
    }

    #[test]
    fn test_detail_routing() {
        let codec = UrlCodec::default();
        let catalog = catalog();
        assert_eq!(codec.decode_route(&Location::parse("/B2"), &catalog), Route::Detail("B2".into()));
        assert_eq!(codec.decode_route(&Location::parse("/Unknown999"), &catalog), Route::Listing);
        assert_eq!(codec.decode_route(&Location::parse("/index.html"), &catalog), Route::Listing);
        assert_eq!(codec.decode_route(&Location::parse("/"), &catalog), Route::Listing);
    }

    #[test]
    fn test_route_candidate_ignores_base_and_assets() {
        let codec = UrlCodec::new("/repo/");
        assert_eq!(codec.route_candidate(&Location::parse("/repo/")), None);
        assert_eq!(codec.route_candidate(&Location::parse("/repo")), None);
        assert_eq!(codec.route_candidate(&Location::parse("/repo/D003")).as_deref(), Some("D003"));
        assert_eq!(codec.route_candidate(&Location::parse("/repo/data")), None);
        assert_eq!(codec.route_candidate(&Location::parse("/repo/style.css")), None);
        assert_eq!(codec.route_candidate(&Location::parse("/elsewhere/X1")).as_deref(), Some("X1"));
    }
}
