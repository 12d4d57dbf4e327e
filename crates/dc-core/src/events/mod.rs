use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Session-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common browsing events
pub mod events {
    use super::Event;
    use crate::navigation::Route;

    /// Both record sets finished loading
    #[derive(Debug, Clone)]
    pub struct CatalogLoaded {
        pub datasets: usize,
        pub publications: usize,
    }

    /// A required resource could not be loaded; the session cannot start
    #[derive(Debug, Clone)]
    pub struct LoadFailed {
        pub resource: String,
        pub error: String,
    }

    /// The router moved to another route
    #[derive(Debug, Clone)]
    pub struct RouteChanged {
        pub route: Route,
        pub href: String,
    }

    /// The filtered view was re-derived
    #[derive(Debug, Clone)]
    pub struct ViewRefreshed {
        pub visible: usize,
        pub total: usize,
        pub href: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(CatalogLoaded, LoadFailed, RouteChanged, ViewRefreshed);
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event.
    ///
    /// Handlers run with the lock released, so they may publish or subscribe.
    /// An event of the same type published from one of its own handlers
    /// reaches only handlers subscribed during that dispatch.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let removed = self.handlers.lock().remove(&type_id);
        let Some(mut running) = removed else {
            return;
        };

        for handler in running.iter_mut() {
            handler.handle(&event);
        }

        let mut handlers = self.handlers.lock();
        let subscribed_meanwhile = handlers.remove(&type_id).unwrap_or_default();
        running.extend(subscribed_meanwhile);
        handlers.insert(type_id, running);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.lock().len())
            .finish()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{CatalogLoaded, ViewRefreshed};
    use super::*;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<ViewRefreshed>(handler_from_fn(move |event| {
            if let Some(refreshed) = event.as_any().downcast_ref::<ViewRefreshed>() {
                sink.lock().push(refreshed.visible);
            }
        }));

        bus.publish(CatalogLoaded {
            datasets: 2,
            publications: 0,
        });
        bus.publish(ViewRefreshed {
            visible: 1,
            total: 2,
            href: "/?search=beta".into(),
        });

        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_handlers_can_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let totals = Arc::new(Mutex::new(Vec::new()));

        let sink = totals.clone();
        bus.subscribe::<ViewRefreshed>(handler_from_fn(move |event| {
            if let Some(refreshed) = event.as_any().downcast_ref::<ViewRefreshed>() {
                sink.lock().push(refreshed.total);
            }
        }));

        let inner = bus.clone();
        bus.subscribe::<CatalogLoaded>(handler_from_fn(move |event| {
            if let Some(loaded) = event.as_any().downcast_ref::<CatalogLoaded>() {
                inner.publish(ViewRefreshed {
                    visible: loaded.datasets,
                    total: loaded.datasets,
                    href: "/".into(),
                });
                inner.subscribe::<CatalogLoaded>(handler_from_fn(|_| {}));
            }
        }));

        bus.publish(CatalogLoaded {
            datasets: 3,
            publications: 0,
        });
        bus.publish(CatalogLoaded {
            datasets: 4,
            publications: 0,
        });

        assert_eq!(*totals.lock(), vec![3, 4]);
    }
}
