//! Transport routing core for the IMS stack
//!
//! This crate decides *where* SIP and MSRP messages go, and tracks the network
//! connectivity those decisions depend on. Sockets, parsing and TLS live
//! outside; messages are seen only through the [`ImsMessage`] trait and the
//! injected per-protocol helpers in [`message`].
//!
//! - [`routing`]: routes, per-entity route tables, message routers and the
//!   [`RouterSet`] dispatching across them
//! - [`events`]: route-added / route-removed notifications
//! - [`context`]: per-entity message parameters (lifetime, rate, log rendering)
//! - [`connection`]: connectivity resolution and change notification

pub mod connection;
pub mod context;
pub mod entity;
pub mod error;
pub mod events;
pub mod message;
pub mod routing;

pub use connection::{
    ConnectionState, ConnectivityChange, ConnectivityListener, ConnectivityResolver,
    ConnectivityStatus, MockConnectivity, MockNetworkInfo, NetworkType, PlatformConnectivity,
    PlatformNetworkInfo, ResolveConnectivity,
};
pub use context::{
    DEFAULT_MAX_LOGGED_BODY, DEFAULT_MESSAGE_LIFETIME, DEFAULT_MESSAGE_RATE, MessageContext,
    MessageContextConfig,
};
pub use entity::EntityType;
pub use error::{Result, RoutingError};
pub use events::{RouterEvent, RouterListener};
pub use message::{ImsMessage, MsrpMessageUtil, SipMessageUtil};
pub use routing::{
    MessageRouter, MsrpRouteKeys, Route, RouteDescriptor, RouteKey, RouteKeyDerivation,
    RouteTable, RouterSet, SipRouteKeys, TransportProtocol,
};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{
        ConnectionState, ConnectivityResolver, EntityType, ImsMessage, MessageContext,
        MessageRouter, NetworkType, Route, RouteDescriptor, RouteKey, RouterSet, RoutingError,
    };
}
