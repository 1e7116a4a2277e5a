use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state of the default network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    Connecting,
    Disconnecting,
    Disconnected,
    Suspended,
    Unknown,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Disconnecting => "DISCONNECTING",
            ConnectionState::Disconnected => "DISCONNECTED",
            ConnectionState::Suspended => "SUSPENDED",
            ConnectionState::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Kind of the default network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    Wifi,
    Cellular,
    Ethernet,
    Mock,
    Unknown,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkType::Wifi => "WIFI",
            NetworkType::Cellular => "CELLULAR",
            NetworkType::Ethernet => "ETHERNET",
            NetworkType::Mock => "MOCK",
            NetworkType::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Resolved connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub state: ConnectionState,
    pub network_type: NetworkType,
}

impl ConnectivityStatus {
    pub fn new(state: ConnectionState, network_type: NetworkType) -> Self {
        Self { state, network_type }
    }

    /// Status before any event has been seen
    pub fn unknown() -> Self {
        Self::new(ConnectionState::Unknown, NetworkType::Unknown)
    }
}

impl Default for ConnectivityStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.state, self.network_type)
    }
}

/// A change of resolved connectivity, delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityChange {
    pub previous: ConnectivityStatus,
    pub current: ConnectivityStatus,
}
