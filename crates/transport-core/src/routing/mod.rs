//! Message routing
//!
//! ## Structure
//!
//! ```text
//!            RouterSet<M>
//!       ┌─────────┴─────────┐
//! MessageRouter<M>    MessageRouter<M>
//!   (SIP, SipRouteKeys)   (MSRP, MsrpRouteKeys)
//!       │                   │
//!   RouteTable           RouteTable
//!  RouteKey → Route     RouteKey → Route
//! ```
//!
//! Each router owns exactly one [`RouteTable`] for its entity type, so keys
//! from different protocols can never collide. Lookups derive one or more
//! candidate [`RouteKey`]s from the message through an injected
//! [`RouteKeyDerivation`] strategy and return the first registered route.

pub mod keys;
pub mod route;
pub mod router;
pub mod set;
pub mod table;

pub use keys::{MsrpRouteKeys, RouteKeyDerivation, SipRouteKeys};
pub use route::{Route, RouteDescriptor, RouteKey, TransportProtocol};
pub use router::MessageRouter;
pub use set::RouterSet;
pub use table::RouteTable;
