//! Entity-specific route key derivation

use crate::entity::EntityType;
use crate::message::{MsrpMessageUtil, SipMessageUtil};

use super::route::RouteKey;

/// Strategy turning a message into the ordered list of keys to try
pub trait RouteKeyDerivation<M>: Send + Sync {
    /// Entity type this strategy understands
    fn entity_type(&self) -> EntityType;

    /// Candidate keys, most specific first
    fn lookup_keys(&self, message: &M) -> Vec<RouteKey>;
}

/// MSRP keys: the From-Path session id, then the To-Path session id
///
/// A session may have been registered under either endpoint's path id
/// depending on which side opened the MSRP connection.
pub struct MsrpRouteKeys<U> {
    util: U,
}

impl<U> MsrpRouteKeys<U> {
    pub fn new(util: U) -> Self {
        Self { util }
    }
}

impl<M, U> RouteKeyDerivation<M> for MsrpRouteKeys<U>
where
    U: MsrpMessageUtil<M>,
{
    fn entity_type(&self) -> EntityType {
        EntityType::Msrp
    }

    fn lookup_keys(&self, message: &M) -> Vec<RouteKey> {
        [self.util.from_path_id(message), self.util.to_path_id(message)]
            .into_iter()
            .flatten()
            .map(RouteKey::from)
            .collect()
    }
}

/// SIP keys: the routing id reported by the SIP helper
pub struct SipRouteKeys<U> {
    util: U,
}

impl<U> SipRouteKeys<U> {
    pub fn new(util: U) -> Self {
        Self { util }
    }
}

impl<M, U> RouteKeyDerivation<M> for SipRouteKeys<U>
where
    U: SipMessageUtil<M>,
{
    fn entity_type(&self) -> EntityType {
        EntityType::Sip
    }

    fn lookup_keys(&self, message: &M) -> Vec<RouteKey> {
        self.util
            .routing_id(message)
            .map(RouteKey::from)
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Paths;

    impl MsrpMessageUtil<(Option<&'static str>, Option<&'static str>)> for Paths {
        fn from_path_id(&self, m: &(Option<&'static str>, Option<&'static str>)) -> Option<String> {
            m.0.map(str::to_string)
        }

        fn to_path_id(&self, m: &(Option<&'static str>, Option<&'static str>)) -> Option<String> {
            m.1.map(str::to_string)
        }
    }

    #[test]
    fn test_msrp_keys_order_from_then_to() {
        let keys = MsrpRouteKeys::new(Paths);
        assert_eq!(
            keys.lookup_keys(&(Some("from"), Some("to"))),
            vec![RouteKey::from("from"), RouteKey::from("to")]
        );
    }

    #[test]
    fn test_msrp_keys_skip_missing_path() {
        let keys = MsrpRouteKeys::new(Paths);
        assert_eq!(keys.lookup_keys(&(None, Some("to"))), vec![RouteKey::from("to")]);
        assert!(keys.lookup_keys(&(None, None)).is_empty());
    }
}
