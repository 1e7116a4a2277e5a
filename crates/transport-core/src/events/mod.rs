//! Router event system
//!
//! Route-added and route-removed notifications are delivered synchronously
//! to [`RouterListener`]s registered on a [`MessageRouter`](crate::MessageRouter).

use crate::routing::Route;

/// Notification about a single route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterEvent {
    route: Route,
}

impl RouterEvent {
    pub fn new(route: Route) -> Self {
        Self { route }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }
}

/// Observer of route table changes
pub trait RouterListener: Send + Sync {
    fn on_route_added(&self, _event: &RouterEvent) {}

    fn on_route_removed(&self, _event: &RouterEvent) {}
}
