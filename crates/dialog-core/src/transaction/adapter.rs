//! Unsubscribe-on-completion listener adapter
//!
//! Many transaction listeners only care about an exchange until their own
//! logic is done: a reinvite guard until the reinvite ends, a NOTIFY handler
//! until the NOTIFY arrived. [`UnsubscribeOnCompletion`] wraps such a
//! listener, forwards every event to it and, the first time the wrapped
//! logic reports completion, runs its cleanup hook and removes itself from
//! the transaction. Events arriving after that are not forwarded.
//!
//! A terminal event always ends the subscription, even when the wrapped
//! listener panics while handling it; the panic is then passed on to the
//! transaction's listener registry.

use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use super::event::TransactionEvent;
use super::listener::TransactionListener;
use super::transaction::Transaction;

/// Completion contract of a listener wrapped by [`UnsubscribeOnCompletion`]
pub trait CompletionHooks<M>: TransactionListener<M> {
    /// Whether the listener has nothing left to do after `event`
    fn is_logic_complete(&self, event: &TransactionEvent<M>) -> bool {
        event.new_state().is_terminal()
    }

    /// Cleanup, run exactly once when the adapter unsubscribes
    fn on_unsubscribe(&self, _transaction: &Transaction<M>) {}
}

/// Forwards events to `L` and unsubscribes once `L`'s logic is complete
pub struct UnsubscribeOnCompletion<M, L> {
    inner: L,
    unsubscribed: AtomicBool,
    _message: PhantomData<fn(&M)>,
}

impl<M, L> UnsubscribeOnCompletion<M, L>
where
    M: 'static,
    L: CompletionHooks<M> + 'static,
{
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            unsubscribed: AtomicBool::new(false),
            _message: PhantomData,
        }
    }

    /// Wrap `inner` and subscribe it to `transaction`
    pub fn attach(transaction: &Transaction<M>, inner: L) -> Arc<Self> {
        let adapter = Arc::new(Self::new(inner));
        transaction.subscribe(adapter.clone());
        adapter
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed.load(Ordering::Acquire)
    }

    /// Run the cleanup hook and leave `transaction`; later calls do nothing
    pub fn unsubscribe_from(&self, transaction: &Transaction<M>) {
        if self.unsubscribed.swap(true, Ordering::AcqRel) {
            return;
        }
        debug!("Listener unsubscribing from transaction {}", transaction.id());
        self.inner.on_unsubscribe(transaction);
        transaction.unsubscribe(self);
    }
}

impl<M, L> TransactionListener<M> for UnsubscribeOnCompletion<M, L>
where
    M: 'static,
    L: CompletionHooks<M> + 'static,
{
    fn on_state_changed(&self, event: &TransactionEvent<M>) {
        if self.is_unsubscribed() {
            return;
        }
        let forwarded = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_state_changed(event);
            self.inner.is_logic_complete(event)
        }));
        match forwarded {
            Ok(true) => self.unsubscribe_from(event.transaction()),
            Ok(false) => {}
            Err(panic) => {
                if event.new_state().is_terminal() {
                    self.unsubscribe_from(event.transaction());
                }
                resume_unwind(panic);
            }
        }
    }
}

impl<M, L: fmt::Debug> fmt::Debug for UnsubscribeOnCompletion<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsubscribeOnCompletion")
            .field("inner", &self.inner)
            .field("unsubscribed", &self.unsubscribed.load(Ordering::Acquire))
            .finish()
    }
}
