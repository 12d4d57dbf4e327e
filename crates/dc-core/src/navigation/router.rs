//! Router implementation

use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use super::{HistoryUpdate, NavigationTarget, Route, RouteSubscriber};
use crate::catalog::CatalogStore;
use crate::location::{Location, UrlCodec};
use crate::state::{ListingState, ViewState};

/// Tracks the current route and decides the history entry for each transition
pub struct Router {
    codec: UrlCodec,
    route: Route,
    subscribers: Vec<Weak<dyn RouteSubscriber>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("codec", &self.codec)
            .field("route", &self.route)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Router {
    pub fn new(codec: UrlCodec) -> Self {
        Self {
            codec,
            route: Route::Listing,
            subscribers: Vec::new(),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn codec(&self) -> &UrlCodec {
        &self.codec
    }

    /// Resolve the startup location.
    ///
    /// A path stashed by the not-found page wins over the literal location
    /// and replaces the current history entry, so the back stack does not
    /// grow.
    pub fn start(
        &mut self,
        current: &Location,
        stashed: Option<String>,
        catalog: &CatalogStore,
    ) -> (ListingState, HistoryUpdate) {
        let (location, update) = match stashed {
            Some(path) => {
                let location = Location::parse(&path);
                info!(requested = %location, "restoring stashed path");
                let href = location.href();
                (location, HistoryUpdate::Replace(href))
            }
            None => (current.clone(), HistoryUpdate::None),
        };

        let view = self.codec.decode(&location, catalog);
        self.set_route(view.route);
        (view.listing, update)
    }

    /// React to a location the browser already moved to (back/forward).
    /// Never produces a history entry.
    pub fn restore(&mut self, location: &Location, catalog: &CatalogStore) -> ListingState {
        let view = self.codec.decode(location, catalog);
        debug!(route = ?view.route, "restored from history");
        self.set_route(view.route);
        view.listing
    }

    /// Move to a navigation target, pushing one history entry when the route changes
    pub fn navigate(
        &mut self,
        target: NavigationTarget,
        listing: &ListingState,
        catalog: &CatalogStore,
    ) -> HistoryUpdate {
        let next = match target {
            NavigationTarget::Listing => Route::Listing,
            NavigationTarget::Record(code) | NavigationTarget::Reference(code) => {
                match catalog.require(&code) {
                    Ok(_) if self.codec.is_routable(&code) => Route::Detail(code),
                    Ok(_) => {
                        warn!(%code, "code cannot be addressed by a URL, falling back to listing");
                        Route::Listing
                    }
                    Err(err) => {
                        warn!(error = %err, "falling back to listing");
                        Route::Listing
                    }
                }
            }
        };

        if next == self.route {
            return HistoryUpdate::None;
        }
        self.set_route(next);
        HistoryUpdate::Push(self.href(listing))
    }

    /// History entry for a changed listing state
    pub fn listing_changed(&self, listing: &ListingState) -> HistoryUpdate {
        HistoryUpdate::Push(self.href(listing))
    }

    /// Href of the current route with the given listing state
    pub fn href(&self, listing: &ListingState) -> String {
        self.codec.encode(&ViewState {
            route: self.route.clone(),
            listing: listing.clone(),
        })
    }

    pub fn add_subscriber(&mut self, subscriber: Arc<dyn RouteSubscriber>) {
        self.subscribers.push(Arc::downgrade(&subscriber));
    }

    fn set_route(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        self.route = route;

        // Remove any dead weak references
        self.subscribers.retain(|weak| weak.strong_count() > 0);
        for weak in &self.subscribers {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_route_change(&self.route);
            }
        }
    }
}
