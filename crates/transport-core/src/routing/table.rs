use parking_lot::RwLock;
use std::collections::HashMap;

use crate::entity::EntityType;
use crate::error::{Result, RoutingError};

use super::route::{Route, RouteKey};

/// Route storage for a single entity type
///
/// Writers take the lock exclusively; readers share it. [`RouteTable::snapshot`]
/// copies the routes under the same lock, so a snapshot never observes a
/// half-applied insert or removal and is unaffected by later mutation.
#[derive(Debug)]
pub struct RouteTable {
    entity_type: EntityType,
    routes: RwLock<HashMap<RouteKey, Route>>,
}

impl RouteTable {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            routes: RwLock::new(HashMap::new()),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Insert or replace the route under `key`, returning the replaced route
    pub fn insert(&self, key: RouteKey, route: Route) -> Result<Option<Route>> {
        if route.entity_type() != self.entity_type {
            return Err(RoutingError::EntityTypeMismatch {
                expected: self.entity_type,
                actual: route.entity_type(),
                context: format!("route {} under key {}", route, key),
            });
        }
        Ok(self.routes.write().insert(key, route))
    }

    pub fn get(&self, key: &RouteKey) -> Option<Route> {
        self.routes.read().get(key).cloned()
    }

    pub fn remove(&self, key: &RouteKey) -> Option<Route> {
        self.routes.write().remove(key)
    }

    pub fn contains_key(&self, key: &RouteKey) -> bool {
        self.routes.read().contains_key(key)
    }

    /// Independent copy of all routes
    pub fn snapshot(&self) -> Vec<Route> {
        self.routes.read().values().cloned().collect()
    }

    /// Independent copy of all key/route pairs
    pub fn entries(&self) -> Vec<(RouteKey, Route)> {
        self.routes
            .read()
            .iter()
            .map(|(k, r)| (k.clone(), r.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}
