//! Connectivity driven by explicit, synthetic events

use super::resolver::ConnectivityResolver;
use super::state::{ConnectionState, NetworkType};
use super::ResolveConnectivity;

const MOCK_ACCESS_POINT_MAC: &str = "00-1B-FC-0D-4C-F2";

/// Synthetic event naming the state and network type outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockNetworkInfo {
    pub state: ConnectionState,
    pub network_type: NetworkType,
}

impl MockNetworkInfo {
    pub fn new(state: ConnectionState, network_type: NetworkType) -> Self {
        Self { state, network_type }
    }

    /// A connected mock network
    pub fn connected() -> Self {
        Self::new(ConnectionState::Connected, NetworkType::Mock)
    }
}

/// Resolution that takes [`MockNetworkInfo`] at face value
#[derive(Debug, Clone, Copy, Default)]
pub struct MockConnectivity;

impl MockConnectivity {
    /// Resolver seeded with a build-up event
    pub fn resolver(
        build_up: MockNetworkInfo,
    ) -> ConnectivityResolver<MockNetworkInfo, MockConnectivity> {
        ConnectivityResolver::with_default_event(MockConnectivity, build_up)
    }
}

impl ResolveConnectivity<MockNetworkInfo> for MockConnectivity {
    fn resolve_state(&self, event: &MockNetworkInfo) -> ConnectionState {
        event.state
    }

    fn resolve_network_type(&self, event: &MockNetworkInfo) -> NetworkType {
        event.network_type
    }

    fn access_point_mac(&self) -> Option<&str> {
        Some(MOCK_ACCESS_POINT_MAC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_up_event_is_ingested() {
        let resolver = MockConnectivity::resolver(MockNetworkInfo::connected());
        assert_eq!(resolver.current_state(), ConnectionState::Connected);
        assert_eq!(resolver.network_type(), NetworkType::Mock);
        assert_eq!(resolver.access_point_mac(), Some("00-1B-FC-0D-4C-F2"));
    }
}
