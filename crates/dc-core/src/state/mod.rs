//! Session state and the command reducer
//!
//! Every user action becomes a [`Command`]. [`Session::dispatch`] applies it
//! to the owned view state, re-derives the filtered and sorted view, and
//! returns the history entry the driver must record. The session never
//! touches a real browser or timer, which keeps it testable in isolation.

mod browser;
mod debounce;
mod view;

pub use browser::Browser;
pub use debounce::{Debouncer, SearchDebouncer, SEARCH_DEBOUNCE};
pub use view::{ListingState, ViewState};

use tracing::debug;

use crate::catalog::{CatalogStore, RecordDetail};
use crate::location::{Location, UrlCodec};
use crate::navigation::{HistoryUpdate, NavigationTarget, Route, Router};
use crate::query::FilterAttribute;
use crate::record::Record;
use crate::sort::{SortDirection, SortKey, SortSpec};

/// A user action or browser event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetSearch(String),
    /// `None` or a blank value clears the filter
    SetFilter(FilterAttribute, Option<String>),
    SetSort(SortKey, SortDirection),
    ToggleDirection,
    /// Reset search, filters and sort to defaults
    Clear,
    Navigate(NavigationTarget),
    /// The browser moved to another history entry (back/forward)
    Restore(Location),
}

/// Outcome of dispatching a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub history: HistoryUpdate,
    pub route: Route,
    pub route_changed: bool,
    pub listing_changed: bool,
}

/// Loaded catalog plus the mutable view state of one browsing session
#[derive(Debug)]
pub struct Session {
    catalog: CatalogStore,
    listing: ListingState,
    router: Router,
}

impl Session {
    /// Resolve the startup location and derive the initial view.
    ///
    /// The catalog must be fully loaded; a partial catalog is never queried.
    pub fn start(
        catalog: CatalogStore,
        codec: UrlCodec,
        current: &Location,
        stashed: Option<String>,
    ) -> (Self, HistoryUpdate) {
        let mut router = Router::new(codec);
        let (listing, update) = router.start(current, stashed, &catalog);
        let mut session = Self {
            catalog,
            listing,
            router,
        };
        session.refresh();
        (session, update)
    }

    pub fn dispatch(&mut self, command: Command) -> Transition {
        debug!(?command, "dispatch");
        let route_before = self.router.route().clone();
        let listing_before = self.listing.clone();

        let history = match command {
            Command::SetSearch(text) => {
                let text = if text.trim().is_empty() { String::new() } else { text };
                self.update_listing(move |listing| listing.query.search = text)
            }
            Command::SetFilter(attr, value) => {
                self.update_listing(move |listing| listing.query.filters.set(attr, value))
            }
            Command::SetSort(key, direction) => {
                self.update_listing(move |listing| listing.sort = SortSpec::new(key, direction))
            }
            Command::ToggleDirection => self.update_listing(|listing| {
                listing.sort.direction = listing.sort.direction.toggled()
            }),
            Command::Clear => self.update_listing(|listing| *listing = ListingState::default()),
            Command::Navigate(target) => self.router.navigate(target, &self.listing, &self.catalog),
            Command::Restore(location) => {
                let listing = self.router.restore(&location, &self.catalog);
                if listing != self.listing {
                    self.listing = listing;
                    self.refresh();
                }
                HistoryUpdate::None
            }
        };

        let route = self.router.route().clone();
        Transition {
            history,
            route_changed: route != route_before,
            listing_changed: self.listing != listing_before,
            route,
        }
    }

    fn update_listing(&mut self, change: impl FnOnce(&mut ListingState)) -> HistoryUpdate {
        let mut next = self.listing.clone();
        change(&mut next);
        if next == self.listing {
            return HistoryUpdate::None;
        }
        self.listing = next;
        self.refresh();
        self.router.listing_changed(&self.listing)
    }

    fn refresh(&mut self) {
        self.catalog.refresh(&self.listing.query, &self.listing.sort);
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    pub fn route(&self) -> &Route {
        self.router.route()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            route: self.route().clone(),
            listing: self.listing.clone(),
        }
    }

    /// Href of the current view
    pub fn href(&self) -> String {
        self.router.href(&self.listing)
    }

    /// The filtered, sorted records the listing shows
    pub fn visible(&self) -> Vec<&Record> {
        self.catalog.filtered()
    }

    /// Detail of the routed record, when the route is a detail view
    pub fn detail(&self) -> Option<RecordDetail<'_>> {
        self.route()
            .detail_code()
            .and_then(|code| self.catalog.detail(code))
    }
}
