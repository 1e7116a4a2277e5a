use std::fmt;
use std::sync::Arc;

use super::state::TransactionState;
use super::transaction::Transaction;

/// One state transition of a transaction
///
/// Produced once per transition and handed by reference to every listener
/// registered when delivery started.
pub struct TransactionEvent<M> {
    transaction: Arc<Transaction<M>>,
    trigger: Option<Arc<M>>,
    previous: TransactionState,
    new: TransactionState,
}

impl<M> TransactionEvent<M> {
    pub fn new(
        transaction: Arc<Transaction<M>>,
        trigger: Option<Arc<M>>,
        previous: TransactionState,
        new: TransactionState,
    ) -> Self {
        Self {
            transaction,
            trigger,
            previous,
            new,
        }
    }

    pub fn transaction(&self) -> &Arc<Transaction<M>> {
        &self.transaction
    }

    /// Message that caused the transition; absent for local cancellation and expiry
    pub fn trigger(&self) -> Option<&M> {
        self.trigger.as_deref()
    }

    pub fn previous_state(&self) -> TransactionState {
        self.previous
    }

    pub fn new_state(&self) -> TransactionState {
        self.new
    }
}

impl<M> Clone for TransactionEvent<M> {
    fn clone(&self) -> Self {
        Self {
            transaction: self.transaction.clone(),
            trigger: self.trigger.clone(),
            previous: self.previous,
            new: self.new,
        }
    }
}

impl<M> fmt::Debug for TransactionEvent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionEvent")
            .field("transaction", &self.transaction.id())
            .field("previous", &self.previous)
            .field("new", &self.new)
            .field("has_trigger", &self.trigger.is_some())
            .finish()
    }
}
