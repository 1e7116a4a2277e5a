//! Message abstraction seen by the routing layer
//!
//! Parsing and serialization are external. The routing core needs only the
//! entity type of a message plus a few protocol-specific identifiers, which
//! are read through helper traits passed to the routers at construction.

use crate::entity::EntityType;

/// Minimal view of a parsed SIP or MSRP message
pub trait ImsMessage: Send + Sync {
    /// Protocol family of this message
    fn entity_type(&self) -> EntityType;

    /// One-line summary for diagnostics (method/status and ids)
    fn short_description(&self) -> String;

    /// Full textual rendering of the message
    fn build_content(&self) -> String {
        self.short_description()
    }

    /// Raw body, if any
    fn body(&self) -> Option<&[u8]> {
        None
    }
}

impl<M: ImsMessage + ?Sized> ImsMessage for std::sync::Arc<M> {
    fn entity_type(&self) -> EntityType {
        (**self).entity_type()
    }

    fn short_description(&self) -> String {
        (**self).short_description()
    }

    fn build_content(&self) -> String {
        (**self).build_content()
    }

    fn body(&self) -> Option<&[u8]> {
        (**self).body()
    }
}

/// MSRP accessors used for route key derivation
pub trait MsrpMessageUtil<M>: Send + Sync {
    /// Session identifier of the From-Path header
    fn from_path_id(&self, message: &M) -> Option<String>;

    /// Session identifier of the To-Path header
    fn to_path_id(&self, message: &M) -> Option<String>;
}

/// SIP accessors used for route key derivation
pub trait SipMessageUtil<M>: Send + Sync {
    /// Identifier under which the transport for this message was registered
    fn routing_id(&self, message: &M) -> Option<String>;
}
