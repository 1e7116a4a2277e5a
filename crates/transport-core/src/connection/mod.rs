//! Connectivity resolution
//!
//! Platform connectivity events (whatever the host reports) are turned into a
//! `(ConnectionState, NetworkType)` pair by a [`ResolveConnectivity`]
//! implementation. The [`ConnectivityResolver`] caches the latest event and
//! pair, and tells [`ConnectivityListener`]s and `watch` receivers when the
//! pair changes.

pub mod mock;
pub mod platform;
pub mod resolver;
pub mod state;

pub use mock::{MockConnectivity, MockNetworkInfo};
pub use platform::{PlatformConnectivity, PlatformNetworkInfo};
pub use resolver::ConnectivityResolver;
pub use state::{ConnectionState, ConnectivityChange, ConnectivityStatus, NetworkType};

/// Maps platform events of type `E` to connection state and network type
pub trait ResolveConnectivity<E>: Send + Sync {
    fn resolve_state(&self, event: &E) -> ConnectionState;

    fn resolve_network_type(&self, event: &E) -> NetworkType;

    /// MAC address of the current access point, when the platform exposes it
    fn access_point_mac(&self) -> Option<&str> {
        None
    }
}

/// Observer of connectivity changes
pub trait ConnectivityListener: Send + Sync {
    fn on_connectivity_changed(&self, change: &ConnectivityChange);
}
