use std::sync::Arc;

use tracing::info;

use super::{Command, Session, Transition};
use crate::catalog::CatalogStore;
use crate::events::events::{CatalogLoaded, RouteChanged, ViewRefreshed};
use crate::events::EventBus;
use crate::location::{History, RedirectStash, UrlCodec, REDIRECT_STASH_KEY};
use crate::navigation::HistoryUpdate;

/// Drives a [`Session`] against a browser history and publishes events
pub struct Browser<H: History> {
    session: Session,
    history: H,
    event_bus: Arc<EventBus>,
}

impl<H: History> Browser<H> {
    /// Start a session on a fully loaded catalog.
    ///
    /// Consumes the redirect stash so a reload does not replay it.
    pub fn start(
        catalog: CatalogStore,
        codec: UrlCodec,
        mut history: H,
        stash: &mut dyn RedirectStash,
        event_bus: Arc<EventBus>,
    ) -> Self {
        event_bus.publish(CatalogLoaded {
            datasets: catalog.len(),
            publications: catalog.publications().len(),
        });

        let stashed = stash.take(REDIRECT_STASH_KEY);
        let (session, update) = Session::start(catalog, codec, &history.current(), stashed);
        apply_history(&mut history, &update);

        info!(route = ?session.route(), href = %history.current(), "session started");

        let browser = Self {
            session,
            history,
            event_bus,
        };
        browser.publish_route();
        browser.publish_view();
        browser
    }

    pub fn dispatch(&mut self, command: Command) -> Transition {
        let transition = self.session.dispatch(command);
        apply_history(&mut self.history, &transition.history);

        if transition.route_changed {
            self.publish_route();
        }
        if transition.listing_changed {
            self.publish_view();
        }
        transition
    }

    /// Browser back button. Returns `None` at the start of history.
    pub fn back(&mut self) -> Option<Transition> {
        let location = self.history.back()?;
        Some(self.dispatch(Command::Restore(location)))
    }

    /// Browser forward button. Returns `None` at the end of history.
    pub fn forward(&mut self) -> Option<Transition> {
        let location = self.history.forward()?;
        Some(self.dispatch(Command::Restore(location)))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    fn publish_route(&self) {
        self.event_bus.publish(RouteChanged {
            route: self.session.route().clone(),
            href: self.session.href(),
        });
    }

    fn publish_view(&self) {
        let catalog = self.session.catalog();
        self.event_bus.publish(ViewRefreshed {
            visible: catalog.filtered_len(),
            total: catalog.len(),
            href: self.session.href(),
        });
    }
}

fn apply_history<H: History>(history: &mut H, update: &HistoryUpdate) {
    match update {
        HistoryUpdate::None => {}
        HistoryUpdate::Push(href) => history.push(href),
        HistoryUpdate::Replace(href) => history.replace(href),
    }
}
