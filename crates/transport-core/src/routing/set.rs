use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::entity::EntityType;
use crate::error::Result;
use crate::message::ImsMessage;

use super::route::Route;
use super::router::MessageRouter;

/// One router per entity type, selected by the message's entity type
pub struct RouterSet<M> {
    routers: RwLock<HashMap<EntityType, Arc<MessageRouter<M>>>>,
}

impl<M> Default for RouterSet<M> {
    fn default() -> Self {
        Self {
            routers: RwLock::new(HashMap::new()),
        }
    }
}

impl<M> RouterSet<M>
where
    M: ImsMessage + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `router` for its entity type, returning the router it replaced
    pub fn register(&self, router: Arc<MessageRouter<M>>) -> Option<Arc<MessageRouter<M>>> {
        let entity_type = router.entity_type();
        info!("Registering {} router", entity_type);
        self.routers.write().insert(entity_type, router)
    }

    pub fn router(&self, entity_type: EntityType) -> Option<Arc<MessageRouter<M>>> {
        self.routers.read().get(&entity_type).cloned()
    }

    /// Route through the router for the message's entity type
    ///
    /// A message whose entity type has no router is simply unroutable.
    pub fn route(&self, message: &M) -> Result<Option<Route>> {
        match self.router(message.entity_type()) {
            Some(router) => router.route(message),
            None => {
                debug!("No router registered for {}", message.entity_type());
                Ok(None)
            }
        }
    }

    /// Routes of every registered router
    pub fn active_routes(&self) -> Vec<Route> {
        let routers: Vec<_> = self.routers.read().values().cloned().collect();
        routers.iter().flat_map(|r| r.active_routes()).collect()
    }
}
