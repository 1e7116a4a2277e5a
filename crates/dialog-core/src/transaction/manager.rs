use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info};

use ims_transport_core::DEFAULT_MESSAGE_LIFETIME;

use crate::dialog::Dialog;
use crate::errors::TransactionResult;

use super::event::TransactionEvent;
use super::listener::TransactionListener;
use super::state::{TransactionId, TransactionKind, TransactionState};
use super::transaction::Transaction;

type TransactionMap<M> = DashMap<TransactionId, Arc<Transaction<M>>>;

/// Registry of live transactions
///
/// A transaction is tracked from [`create`](Self::create) until it reaches a
/// terminal state, at which point it is dropped from the registry.
pub struct TransactionManager<M> {
    transactions: Arc<TransactionMap<M>>,
    message_lifetime: Duration,
}

impl<M: Send + Sync + 'static> Default for TransactionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + Sync + 'static> TransactionManager<M> {
    pub fn new() -> Self {
        Self::with_message_lifetime(DEFAULT_MESSAGE_LIFETIME)
    }

    /// Manager expiring initiated transactions after `message_lifetime`
    pub fn with_message_lifetime(message_lifetime: Duration) -> Self {
        Self {
            transactions: Arc::new(DashMap::new()),
            message_lifetime,
        }
    }

    pub fn message_lifetime(&self) -> Duration {
        self.message_lifetime
    }

    /// Create and track a transaction, optionally owned by `dialog`
    pub fn create(
        &self,
        kind: TransactionKind,
        dialog: Option<Arc<Dialog>>,
    ) -> TransactionResult<Arc<Transaction<M>>> {
        let transaction = match dialog {
            Some(dialog) => Transaction::for_dialog(kind, dialog)?,
            None => Transaction::new(kind),
        };

        transaction.subscribe(Arc::new(Reaper {
            transactions: Arc::downgrade(&self.transactions),
        }));
        self.transactions.insert(transaction.id(), transaction.clone());
        debug!(
            "Tracking {} transaction {} ({} live)",
            kind,
            transaction.id(),
            self.transactions.len()
        );
        Ok(transaction)
    }

    pub fn get(&self, id: &TransactionId) -> Option<Arc<Transaction<M>>> {
        self.transactions.get(id).map(|entry| entry.value().clone())
    }

    pub fn active_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn active_transactions(&self) -> Vec<Arc<Transaction<M>>> {
        self.transactions.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Fail every initiated transaction older than the message lifetime
    ///
    /// Returns the number of transactions expired.
    pub fn expire_overdue(&self) -> usize {
        let overdue: Vec<_> = self
            .transactions
            .iter()
            .filter(|entry| {
                let tx = entry.value();
                tx.state() == TransactionState::Initiated
                    && tx.elapsed_since_initiated().is_some_and(|age| age > self.message_lifetime)
            })
            .map(|entry| entry.value().clone())
            .collect();

        let mut expired = 0;
        for tx in overdue {
            // A concurrent response may have finished it meanwhile
            if tx.time_out().is_ok() {
                expired += 1;
            }
        }
        if expired > 0 {
            info!("Expired {} overdue transactions", expired);
        }
        expired
    }
}

impl<M> std::fmt::Debug for TransactionManager<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("live", &self.transactions.len())
            .field("message_lifetime", &self.message_lifetime)
            .finish()
    }
}

/// Drops terminated transactions from the manager
struct Reaper<M> {
    transactions: Weak<TransactionMap<M>>,
}

impl<M: Send + Sync> TransactionListener<M> for Reaper<M> {
    fn on_state_changed(&self, event: &TransactionEvent<M>) {
        if !event.new_state().is_terminal() {
            return;
        }
        if let Some(transactions) = self.transactions.upgrade() {
            transactions.remove(&event.transaction().id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::InitiateParty;

    #[test]
    fn test_terminal_transactions_are_dropped() {
        let manager = TransactionManager::<String>::new();
        let tx = manager.create(TransactionKind::Register, None).unwrap();
        assert_eq!(manager.active_count(), 1);
        assert!(manager.get(&tx.id()).is_some());

        tx.initiate("REGISTER".to_string()).unwrap();
        tx.complete("200 OK".to_string()).unwrap();

        assert_eq!(manager.active_count(), 0);
        assert!(manager.get(&tx.id()).is_none());
    }

    #[test]
    fn test_refuses_terminated_dialog() {
        let manager = TransactionManager::<String>::new();
        let dialog = Arc::new(Dialog::new("call-9@host", InitiateParty::Remote));
        dialog.terminate();

        assert!(manager.create(TransactionKind::ReInvite, Some(dialog)).is_err());
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_expire_overdue() {
        let manager =
            TransactionManager::<String>::with_message_lifetime(Duration::from_millis(20));
        let dialog = Arc::new(Dialog::new("call-2@host", InitiateParty::Local));

        let overdue = manager.create(TransactionKind::Invite, Some(dialog.clone())).unwrap();
        let untouched = manager.create(TransactionKind::Options, None).unwrap();
        overdue.initiate("INVITE".to_string()).unwrap();

        std::thread::sleep(Duration::from_millis(50));
        let fresh = manager.create(TransactionKind::Message, None).unwrap();
        fresh.initiate("MESSAGE".to_string()).unwrap();

        assert_eq!(manager.expire_overdue(), 1);
        assert_eq!(overdue.state(), TransactionState::Failed);
        assert_eq!(untouched.state(), TransactionState::Created);
        assert_eq!(fresh.state(), TransactionState::Initiated);
        assert_eq!(manager.active_count(), 2);
        assert!(dialog.active_transactions().is_empty());
    }
}
