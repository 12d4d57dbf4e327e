//! Route subscriber trait

use super::Route;

/// Trait for components that need to respond to route changes
pub trait RouteSubscriber: Send + Sync {
    /// Called after the router moved to a different route
    fn on_route_change(&self, route: &Route);
}
