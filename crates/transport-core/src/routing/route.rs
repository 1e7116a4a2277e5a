use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

use crate::entity::EntityType;

/// Transport protocol of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportProtocol {
    Udp,
    Tcp,
    Tls,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProtocol::Udp => write!(f, "UDP"),
            TransportProtocol::Tcp => write!(f, "TCP"),
            TransportProtocol::Tls => write!(f, "TLS"),
        }
    }
}

/// A forwarding target for messages of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    entity_type: EntityType,
    protocol: TransportProtocol,
    local_port: u16,
    destination: SocketAddr,
}

impl Route {
    pub fn new(
        entity_type: EntityType,
        protocol: TransportProtocol,
        local_port: u16,
        destination: SocketAddr,
    ) -> Self {
        Self {
            entity_type,
            protocol,
            local_port,
            destination,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn protocol(&self) -> TransportProtocol {
        self.protocol
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} :{} -> {}",
            self.entity_type, self.protocol, self.local_port, self.destination
        )
    }
}

/// Opaque, value-equal routing key (e.g. an MSRP session path id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteKey {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RouteKey {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to register a route: its key and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    entity_type: EntityType,
    key: RouteKey,
    context: Option<String>,
}

impl RouteDescriptor {
    pub fn new(entity_type: EntityType, key: impl Into<RouteKey>) -> Self {
        Self {
            entity_type,
            key: key.into(),
            context: None,
        }
    }

    /// Attach a free-form note about the session setup that created the route
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_route_key_value_equality() {
        let a = RouteKey::from("path-a");
        let b = RouteKey::new(String::from("path-a"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&RouteKey::from("path-b")));
    }

    #[test]
    fn test_route_display() {
        let route = Route::new(
            EntityType::Msrp,
            TransportProtocol::Tcp,
            2855,
            "10.0.0.7:2855".parse().unwrap(),
        );
        assert_eq!(route.to_string(), "MSRP/TCP :2855 -> 10.0.0.7:2855");
    }

    #[test]
    fn test_descriptor_context() {
        let descriptor =
            RouteDescriptor::new(EntityType::Msrp, "abc").with_context("file transfer");
        assert_eq!(descriptor.key().as_str(), "abc");
        assert_eq!(descriptor.context(), Some("file transfer"));
        assert_eq!(descriptor.entity_type(), EntityType::Msrp);
    }
}
