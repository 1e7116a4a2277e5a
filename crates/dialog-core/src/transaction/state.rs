use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a transaction
///
/// ```text
/// Created ──► Initiated ──► Completed
///    │            ├───────► Failed
///    │            └───────► Cancelled
///    └──────────► Failed | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    Created,
    Initiated,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionState::Completed | TransactionState::Failed | TransactionState::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: TransactionState) -> bool {
        use TransactionState::*;
        matches!(
            (self, next),
            (Created, Initiated)
                | (Created, Failed)
                | (Created, Cancelled)
                | (Initiated, Completed)
                | (Initiated, Failed)
                | (Initiated, Cancelled)
        )
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionState::Created => "Created",
            TransactionState::Initiated => "Initiated",
            TransactionState::Completed => "Completed",
            TransactionState::Failed => "Failed",
            TransactionState::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// Request kind a transaction was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Invite,
    ReInvite,
    Bye,
    Cancel,
    Subscribe,
    Notify,
    Publish,
    Refer,
    Message,
    Options,
    Register,
    Update,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Invite => "INVITE",
            TransactionKind::ReInvite => "re-INVITE",
            TransactionKind::Bye => "BYE",
            TransactionKind::Cancel => "CANCEL",
            TransactionKind::Subscribe => "SUBSCRIBE",
            TransactionKind::Notify => "NOTIFY",
            TransactionKind::Publish => "PUBLISH",
            TransactionKind::Refer => "REFER",
            TransactionKind::Message => "MESSAGE",
            TransactionKind::Options => "OPTIONS",
            TransactionKind::Register => "REGISTER",
            TransactionKind::Update => "UPDATE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionState::*;

    const ALL: [TransactionState; 5] = [Created, Initiated, Completed, Failed, Cancelled];

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{} -> {} must be refused", from, to);
            }
        }
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(Created.can_transition_to(Initiated));
        assert!(Created.can_transition_to(Cancelled));
        assert!(!Created.can_transition_to(Completed));
        assert!(!Created.can_transition_to(Created));
        assert!(Initiated.can_transition_to(Completed));
        assert!(!Initiated.can_transition_to(Initiated));
    }
}
