use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use ims_infra_common::ListenerRegistry;

use super::state::{ConnectionState, ConnectivityChange, ConnectivityStatus, NetworkType};
use super::{ConnectivityListener, ResolveConnectivity};

struct Cached<E> {
    event: Option<E>,
    status: ConnectivityStatus,
}

/// Caches the default platform event and its resolution
///
/// The cached event and resolved status live under one lock, so readers never
/// see an event paired with the status of another. Listeners are notified
/// outside the lock and only when the resolved status actually changes.
pub struct ConnectivityResolver<E, R> {
    resolve: R,
    cache: RwLock<Cached<E>>,
    listeners: ListenerRegistry<dyn ConnectivityListener>,
    status_tx: watch::Sender<ConnectivityStatus>,
}

impl<E, R> ConnectivityResolver<E, R>
where
    E: Send + Sync,
    R: ResolveConnectivity<E>,
{
    /// Resolver with no event seen yet; status is `Unknown`
    pub fn new(resolve: R) -> Self {
        let (status_tx, _) = watch::channel(ConnectivityStatus::unknown());
        Self {
            resolve,
            cache: RwLock::new(Cached {
                event: None,
                status: ConnectivityStatus::unknown(),
            }),
            listeners: ListenerRegistry::new("connectivity"),
            status_tx,
        }
    }

    /// Resolver that ingests `event` right away
    pub fn with_default_event(resolve: R, event: E) -> Self {
        let resolver = Self::new(resolve);
        resolver.on_connectivity(event);
        resolver
    }

    /// Ingest a platform event
    ///
    /// Returns `true` if the resolved status changed (listeners were told).
    pub fn on_connectivity(&self, event: E) -> bool {
        let current = ConnectivityStatus::new(
            self.resolve.resolve_state(&event),
            self.resolve.resolve_network_type(&event),
        );

        let previous = {
            let mut cache = self.cache.write();
            cache.event = Some(event);
            std::mem::replace(&mut cache.status, current)
        };

        if previous == current {
            debug!("Connectivity event without change: {}", current);
            return false;
        }

        info!("Connectivity changed: {} -> {}", previous, current);
        self.status_tx.send_replace(current);

        let change = ConnectivityChange { previous, current };
        self.listeners.deliver(|l| l.on_connectivity_changed(&change));
        true
    }

    /// Recompute the state from the cached default event
    pub fn resolve_state(&self) -> ConnectionState {
        let cache = self.cache.read();
        cache
            .event
            .as_ref()
            .map_or(ConnectionState::Unknown, |e| self.resolve.resolve_state(e))
    }

    /// Recompute the network type from the cached default event
    pub fn resolve_network_type(&self) -> NetworkType {
        let cache = self.cache.read();
        cache
            .event
            .as_ref()
            .map_or(NetworkType::Unknown, |e| self.resolve.resolve_network_type(e))
    }

    /// Resolve an arbitrary event without touching the cache
    pub fn resolve_state_for(&self, event: &E) -> ConnectionState {
        self.resolve.resolve_state(event)
    }

    pub fn resolve_network_type_for(&self, event: &E) -> NetworkType {
        self.resolve.resolve_network_type(event)
    }

    /// Last resolved state, without recomputation
    pub fn current_state(&self) -> ConnectionState {
        self.cache.read().status.state
    }

    /// Last resolved network type, without recomputation
    pub fn network_type(&self) -> NetworkType {
        self.cache.read().status.network_type
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.cache.read().status
    }

    pub fn access_point_mac(&self) -> Option<&str> {
        self.resolve.access_point_mac()
    }

    pub fn subscribe(&self, listener: Arc<dyn ConnectivityListener>) -> bool {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, listener: &dyn ConnectivityListener) -> bool {
        self.listeners.unsubscribe(listener)
    }

    /// Receiver holding the latest resolved status
    pub fn watch(&self) -> watch::Receiver<ConnectivityStatus> {
        self.status_tx.subscribe()
    }
}

impl<E, R> std::fmt::Debug for ConnectivityResolver<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityResolver")
            .field("status", &self.cache.read().status)
            .field("listeners", &self.listeners)
            .finish()
    }
}
