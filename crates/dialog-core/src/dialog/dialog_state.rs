use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique dialog identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DialogId(pub Uuid);

impl DialogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side started an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiateParty {
    Local,
    Remote,
}

impl fmt::Display for InitiateParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitiateParty::Local => f.write_str("LOCAL"),
            InitiateParty::Remote => f.write_str("REMOTE"),
        }
    }
}

/// Dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogState {
    /// Initial exchange started, no response yet
    Initial,
    /// Provisional response received
    Early,
    Confirmed,
    Terminated,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Initial => write!(f, "Initial"),
            DialogState::Early => write!(f, "Early"),
            DialogState::Confirmed => write!(f, "Confirmed"),
            DialogState::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Sub-state of an event subscription carried by the dialog (RFC 6665)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Inactive,
    Pending,
    Active,
    Terminated,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionState::Inactive => write!(f, "inactive"),
            SubscriptionState::Pending => write!(f, "pending"),
            SubscriptionState::Active => write!(f, "active"),
            SubscriptionState::Terminated => write!(f, "terminated"),
        }
    }
}
