use std::sync::Arc;
use tracing::{debug, warn};

use ims_infra_common::ListenerRegistry;

use crate::entity::EntityType;
use crate::error::{Result, RoutingError};
use crate::events::{RouterEvent, RouterListener};
use crate::message::{ImsMessage, MsrpMessageUtil, SipMessageUtil};

use super::keys::{MsrpRouteKeys, RouteKeyDerivation, SipRouteKeys};
use super::route::{Route, RouteDescriptor, RouteKey};
use super::table::RouteTable;

/// Router for one protocol entity type
///
/// # Examples
///
/// ```
/// use ims_transport_core::{
///     EntityType, ImsMessage, MessageRouter, MsrpMessageUtil, Route, RouteDescriptor,
///     TransportProtocol,
/// };
///
/// struct Chunk { from: String, to: String }
///
/// impl ImsMessage for Chunk {
///     fn entity_type(&self) -> EntityType { EntityType::Msrp }
///     fn short_description(&self) -> String { format!("SEND {} -> {}", self.from, self.to) }
/// }
///
/// struct Paths;
///
/// impl MsrpMessageUtil<Chunk> for Paths {
///     fn from_path_id(&self, m: &Chunk) -> Option<String> { Some(m.from.clone()) }
///     fn to_path_id(&self, m: &Chunk) -> Option<String> { Some(m.to.clone()) }
/// }
///
/// let router = MessageRouter::msrp(Paths);
/// let addr = "10.0.0.2:2855".parse().unwrap();
/// let route = Route::new(EntityType::Msrp, TransportProtocol::Tcp, 2855, addr);
/// router.add_route(route.clone(), &RouteDescriptor::new(EntityType::Msrp, "pathB")).unwrap();
///
/// let chunk = Chunk { from: "pathA".into(), to: "pathB".into() };
/// assert_eq!(router.route(&chunk).unwrap(), Some(route));
/// ```
pub struct MessageRouter<M> {
    table: RouteTable,
    keys: Box<dyn RouteKeyDerivation<M>>,
    listeners: ListenerRegistry<dyn RouterListener>,
}

impl<M> MessageRouter<M>
where
    M: ImsMessage + 'static,
{
    /// Create a router whose entity type is the one the key strategy serves
    pub fn new(keys: impl RouteKeyDerivation<M> + 'static) -> Self {
        let entity_type = keys.entity_type();
        Self {
            table: RouteTable::new(entity_type),
            keys: Box::new(keys),
            listeners: ListenerRegistry::new("router"),
        }
    }

    /// MSRP router looking up From-Path, then To-Path session ids
    pub fn msrp<U>(util: U) -> Self
    where
        U: MsrpMessageUtil<M> + 'static,
    {
        Self::new(MsrpRouteKeys::new(util))
    }

    /// SIP router keyed by the helper's routing id
    pub fn sip<U>(util: U) -> Self
    where
        U: SipMessageUtil<M> + 'static,
    {
        Self::new(SipRouteKeys::new(util))
    }

    pub fn entity_type(&self) -> EntityType {
        self.table.entity_type()
    }

    /// Find the route for a message
    ///
    /// Returns `Ok(None)` when no candidate key is registered. A message of
    /// another entity type is a caller error and yields
    /// [`RoutingError::EntityTypeMismatch`]; the router itself is unaffected.
    pub fn route(&self, message: &M) -> Result<Option<Route>> {
        let actual = message.entity_type();
        if actual != self.entity_type() {
            let err = RoutingError::EntityTypeMismatch {
                expected: self.entity_type(),
                actual,
                context: message.short_description(),
            };
            warn!("Route lookup rejected: {}", err);
            return Err(err);
        }

        for key in self.keys.lookup_keys(message) {
            if let Some(route) = self.table.get(&key) {
                debug!(
                    "{} route {} found under key {} for {}",
                    self.entity_type(),
                    route,
                    key,
                    message.short_description()
                );
                return Ok(Some(route));
            }
        }

        debug!("No {} route for {}", self.entity_type(), message.short_description());
        Ok(None)
    }

    /// Register `route` under the descriptor's key, replacing any previous route
    ///
    /// Route and descriptor must both belong to this router's entity type;
    /// otherwise nothing is stored and the mismatch is returned.
    pub fn add_route(&self, route: Route, descriptor: &RouteDescriptor) -> Result<()> {
        for actual in [route.entity_type(), descriptor.entity_type()] {
            if actual != self.entity_type() {
                let err = RoutingError::EntityTypeMismatch {
                    expected: self.entity_type(),
                    actual,
                    context: format!("add route {} under key {}", route, descriptor.key()),
                };
                warn!("Route registration rejected: {}", err);
                return Err(err);
            }
        }

        debug!("Adding {} route {} under key {}", self.entity_type(), route, descriptor.key());
        if let Some(previous) = self.table.insert(descriptor.key().clone(), route.clone())? {
            debug!("Replaced route {} under key {}", previous, descriptor.key());
        }

        let event = RouterEvent::new(route);
        self.listeners.deliver(|l| l.on_route_added(&event));
        Ok(())
    }

    /// Remove and return the route under `key`
    pub fn remove_route(&self, key: &RouteKey) -> Option<Route> {
        let removed = self.table.remove(key);
        debug!("Removing {} route under key {}: {:?}", self.entity_type(), key, removed);

        if let Some(route) = &removed {
            let event = RouterEvent::new(route.clone());
            self.listeners.deliver(|l| l.on_route_removed(&event));
        }
        removed
    }

    /// Point-in-time copy of the registered routes
    pub fn active_routes(&self) -> Vec<Route> {
        self.table.snapshot()
    }

    pub fn subscribe(&self, listener: Arc<dyn RouterListener>) -> bool {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, listener: &dyn RouterListener) -> bool {
        self.listeners.unsubscribe(listener)
    }
}

impl<M> std::fmt::Debug for MessageRouter<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("table", &self.table)
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::TransportProtocol;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct TestMessage {
        entity_type: EntityType,
        from_path: Option<String>,
        to_path: Option<String>,
        call_id: Option<String>,
    }

    impl TestMessage {
        fn msrp(from: &str, to: &str) -> Self {
            Self {
                entity_type: EntityType::Msrp,
                from_path: Some(from.to_string()),
                to_path: Some(to.to_string()),
                call_id: None,
            }
        }

        fn sip(call_id: &str) -> Self {
            Self {
                entity_type: EntityType::Sip,
                from_path: None,
                to_path: None,
                call_id: Some(call_id.to_string()),
            }
        }
    }

    impl ImsMessage for TestMessage {
        fn entity_type(&self) -> EntityType {
            self.entity_type
        }

        fn short_description(&self) -> String {
            format!("{} test message", self.entity_type)
        }
    }

    struct TestUtil;

    impl MsrpMessageUtil<TestMessage> for TestUtil {
        fn from_path_id(&self, m: &TestMessage) -> Option<String> {
            m.from_path.clone()
        }

        fn to_path_id(&self, m: &TestMessage) -> Option<String> {
            m.to_path.clone()
        }
    }

    impl SipMessageUtil<TestMessage> for TestUtil {
        fn routing_id(&self, m: &TestMessage) -> Option<String> {
            m.call_id.clone()
        }
    }

    #[derive(Default)]
    struct EventLog {
        added: Mutex<Vec<Route>>,
        removed: Mutex<Vec<Route>>,
    }

    impl RouterListener for EventLog {
        fn on_route_added(&self, event: &RouterEvent) {
            self.added.lock().push(event.route().clone());
        }

        fn on_route_removed(&self, event: &RouterEvent) {
            self.removed.lock().push(event.route().clone());
        }
    }

    fn route(entity_type: EntityType, port: u16) -> Route {
        Route::new(
            entity_type,
            TransportProtocol::Tcp,
            port,
            format!("198.51.100.4:{}", port).parse().unwrap(),
        )
    }

    #[test]
    fn test_msrp_from_path_lookup() {
        let router = MessageRouter::msrp(TestUtil);
        let r1 = route(EntityType::Msrp, 2855);
        router.add_route(r1.clone(), &RouteDescriptor::new(EntityType::Msrp, "pathA")).unwrap();

        let msg = TestMessage::msrp("pathA", "pathZ");
        assert_eq!(router.route(&msg).unwrap(), Some(r1));
    }

    #[test]
    fn test_msrp_falls_back_to_to_path() {
        let router = MessageRouter::msrp(TestUtil);
        let r = route(EntityType::Msrp, 2856);
        router.add_route(r.clone(), &RouteDescriptor::new(EntityType::Msrp, "K2")).unwrap();

        let msg = TestMessage::msrp("K1", "K2");
        assert_eq!(router.route(&msg).unwrap(), Some(r));
    }

    #[test]
    fn test_from_path_wins_over_to_path() {
        let router = MessageRouter::msrp(TestUtil);
        let from_route = route(EntityType::Msrp, 1);
        let to_route = route(EntityType::Msrp, 2);
        router.add_route(from_route.clone(), &RouteDescriptor::new(EntityType::Msrp, "F")).unwrap();
        router.add_route(to_route, &RouteDescriptor::new(EntityType::Msrp, "T")).unwrap();

        assert_eq!(router.route(&TestMessage::msrp("F", "T")).unwrap(), Some(from_route));
    }

    #[test]
    fn test_wrong_entity_message_is_error() {
        let router = MessageRouter::msrp(TestUtil);
        let err = router.route(&TestMessage::sip("call-1")).unwrap_err();
        assert_eq!(
            err,
            RoutingError::EntityTypeMismatch {
                expected: EntityType::Msrp,
                actual: EntityType::Sip,
                context: "SIP test message".to_string(),
            }
        );
    }

    #[test]
    fn test_add_route_rejects_foreign_route() {
        let router = MessageRouter::<TestMessage>::msrp(TestUtil);
        let log = Arc::new(EventLog::default());
        router.subscribe(log.clone());

        let msrp_key = RouteDescriptor::new(EntityType::Msrp, "x");
        let result = router.add_route(route(EntityType::Sip, 5060), &msrp_key);
        assert!(result.is_err());

        let sip_key = RouteDescriptor::new(EntityType::Sip, "x");
        let result = router.add_route(route(EntityType::Msrp, 1), &sip_key);
        assert!(result.is_err());

        assert!(router.active_routes().is_empty());
        assert!(log.added.lock().is_empty());
    }

    #[test]
    fn test_notifications() {
        let router = MessageRouter::<TestMessage>::sip(TestUtil);
        let log = Arc::new(EventLog::default());
        router.subscribe(log.clone());

        let r = route(EntityType::Sip, 5060);
        router.add_route(r.clone(), &RouteDescriptor::new(EntityType::Sip, "call-1")).unwrap();
        assert_eq!(router.remove_route(&"missing".into()), None);
        assert_eq!(router.remove_route(&"call-1".into()), Some(r.clone()));

        assert_eq!(*log.added.lock(), vec![r.clone()]);
        assert_eq!(*log.removed.lock(), vec![r]);

        assert!(router.unsubscribe(&*log));
        let late = RouteDescriptor::new(EntityType::Sip, "call-2");
        router.add_route(route(EntityType::Sip, 5061), &late).unwrap();
        assert_eq!(log.added.lock().len(), 1);
    }

    #[test]
    fn test_sip_routing_id_lookup() {
        let router = MessageRouter::sip(TestUtil);
        let r = route(EntityType::Sip, 5060);
        router.add_route(r.clone(), &RouteDescriptor::new(EntityType::Sip, "abc@host")).unwrap();

        assert_eq!(router.route(&TestMessage::sip("abc@host")).unwrap(), Some(r));
        assert_eq!(router.route(&TestMessage::sip("other@host")).unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_during_concurrent_mutation() {
        let router = Arc::new(MessageRouter::<TestMessage>::msrp(TestUtil));
        let mut writers = Vec::new();

        for worker in 0..4u16 {
            let router = router.clone();
            writers.push(tokio::task::spawn_blocking(move || {
                for i in 0..200u16 {
                    let key = RouteKey::from(format!("w{}-{}", worker, i));
                    router
                        .add_route(
                            route(EntityType::Msrp, i),
                            &RouteDescriptor::new(EntityType::Msrp, key.clone()),
                        )
                        .unwrap();
                    if i % 2 == 0 {
                        router.remove_route(&key);
                    }
                }
            }));
        }

        let reader = {
            let router = router.clone();
            tokio::task::spawn_blocking(move || {
                for _ in 0..500 {
                    let snapshot = router.active_routes();
                    assert!(snapshot.len() <= 800);
                    assert!(snapshot.iter().all(|r| r.entity_type() == EntityType::Msrp));
                }
            })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        assert_eq!(router.active_routes().len(), 4 * 100);
    }

    proptest! {
        #[test]
        fn prop_add_then_remove(key in "[a-zA-Z0-9]{1,12}", port in 1u16..u16::MAX) {
            let router = MessageRouter::msrp(TestUtil);
            let r = route(EntityType::Msrp, port);
            router
                .add_route(r.clone(), &RouteDescriptor::new(EntityType::Msrp, key.as_str()))
                .unwrap();

            let msg = TestMessage::msrp(&key, "unregistered-peer");
            prop_assert_eq!(router.route(&msg).unwrap(), Some(r.clone()));
            prop_assert_eq!(router.remove_route(&RouteKey::from(key.as_str())), Some(r));
            prop_assert_eq!(router.route(&msg).unwrap(), None);
        }
    }
}
