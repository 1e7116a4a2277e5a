//! Connectivity from platform-reported network info

use super::state::{ConnectionState, NetworkType};
use super::ResolveConnectivity;

/// Network info as reported by the host platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformNetworkInfo {
    /// e.g. `WIFI`, `MOBILE`, `ETHERNET`
    pub type_name: String,
    /// e.g. `CONNECTED`, `DISCONNECTED`
    pub state_name: String,
    pub available: bool,
}

impl PlatformNetworkInfo {
    pub fn new(
        type_name: impl Into<String>,
        state_name: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            state_name: state_name.into(),
            available,
        }
    }
}

/// Resolution by platform type and state names
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformConnectivity;

impl ResolveConnectivity<PlatformNetworkInfo> for PlatformConnectivity {
    fn resolve_state(&self, event: &PlatformNetworkInfo) -> ConnectionState {
        if !event.available {
            return ConnectionState::Disconnected;
        }
        match event.state_name.trim().to_ascii_uppercase().as_str() {
            "CONNECTED" => ConnectionState::Connected,
            "CONNECTING" => ConnectionState::Connecting,
            "DISCONNECTING" => ConnectionState::Disconnecting,
            "DISCONNECTED" => ConnectionState::Disconnected,
            "SUSPENDED" => ConnectionState::Suspended,
            _ => ConnectionState::Unknown,
        }
    }

    fn resolve_network_type(&self, event: &PlatformNetworkInfo) -> NetworkType {
        match event.type_name.trim().to_ascii_uppercase().as_str() {
            "WIFI" => NetworkType::Wifi,
            "MOBILE" | "CELLULAR" | "LTE" => NetworkType::Cellular,
            "ETHERNET" => NetworkType::Ethernet,
            "MOCK" => NetworkType::Mock,
            _ => NetworkType::Unknown,
        }
    }
}
