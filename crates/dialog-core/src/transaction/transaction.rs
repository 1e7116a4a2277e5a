use parking_lot::{ReentrantMutex, RwLock};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use ims_infra_common::ListenerRegistry;

use crate::dialog::Dialog;
use crate::errors::{TransactionError, TransactionResult};

use super::event::TransactionEvent;
use super::listener::TransactionListener;
use super::state::{TransactionId, TransactionKind, TransactionState};

#[derive(Debug)]
struct Lifecycle {
    state: TransactionState,
    initiated_at: Option<Instant>,
}

/// Events waiting for delivery, owned by whichever thread holds the delivery lock
struct Delivery<M> {
    running: Cell<bool>,
    pending: RefCell<VecDeque<TransactionEvent<M>>>,
}

impl<M> Delivery<M> {
    fn new() -> Self {
        Self {
            running: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }
}

/// One request/response exchange
///
/// Transitions are serialized per transaction: the delivery lock is held
/// from the state change until every listener has seen the event. The lock
/// is reentrant, so a listener may drive this same transaction from inside
/// its callback. The state changes immediately, but the nested event is
/// queued and delivered once the current event has reached every listener,
/// so all listeners observe states in transition order. Once a terminal
/// event has been delivered the listener registry is cleared and the
/// transaction leaves its dialog.
pub struct Transaction<M> {
    id: TransactionId,
    kind: TransactionKind,
    dialog: Option<Arc<Dialog>>,
    lifecycle: RwLock<Lifecycle>,
    delivery: ReentrantMutex<Delivery<M>>,
    listeners: ListenerRegistry<dyn TransactionListener<M>>,
}

impl<M> Transaction<M> {
    /// Transaction not bound to any dialog
    pub fn new(kind: TransactionKind) -> Arc<Self> {
        Arc::new(Self::build(kind, None))
    }

    /// Transaction owned by `dialog`
    ///
    /// Fails if the dialog is already terminated.
    pub fn for_dialog(kind: TransactionKind, dialog: Arc<Dialog>) -> TransactionResult<Arc<Self>> {
        let transaction = Self::build(kind, Some(dialog.clone()));
        dialog.attach_transaction(transaction.id)?;
        debug!("Created {} transaction {} in dialog {}", kind, transaction.id, dialog.id());
        Ok(Arc::new(transaction))
    }

    fn build(kind: TransactionKind, dialog: Option<Arc<Dialog>>) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            dialog,
            lifecycle: RwLock::new(Lifecycle {
                state: TransactionState::Created,
                initiated_at: None,
            }),
            delivery: ReentrantMutex::new(Delivery::new()),
            listeners: ListenerRegistry::new("transaction"),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn state(&self) -> TransactionState {
        self.lifecycle.read().state
    }

    pub fn dialog(&self) -> Option<&Arc<Dialog>> {
        self.dialog.as_ref()
    }

    /// Time since the request was dispatched, if it has been
    pub fn elapsed_since_initiated(&self) -> Option<Duration> {
        self.lifecycle.read().initiated_at.map(|at| at.elapsed())
    }

    pub fn subscribe(&self, listener: Arc<dyn TransactionListener<M>>) -> bool {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, listener: &dyn TransactionListener<M>) -> bool {
        self.listeners.unsubscribe(listener)
    }

    pub fn is_subscribed(&self, listener: &dyn TransactionListener<M>) -> bool {
        self.listeners.contains(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The request was dispatched
    pub fn initiate(self: &Arc<Self>, request: impl Into<Arc<M>>) -> TransactionResult<()> {
        self.transition(TransactionState::Initiated, Some(request.into()))
    }

    /// A final response arrived
    pub fn complete(self: &Arc<Self>, response: impl Into<Arc<M>>) -> TransactionResult<()> {
        self.transition(TransactionState::Completed, Some(response.into()))
    }

    /// The exchange failed with an error response or a transport error report
    pub fn fail(self: &Arc<Self>, message: impl Into<Arc<M>>) -> TransactionResult<()> {
        self.transition(TransactionState::Failed, Some(message.into()))
    }

    /// No final response within the message lifetime
    pub fn time_out(self: &Arc<Self>) -> TransactionResult<()> {
        self.transition(TransactionState::Failed, None)
    }

    /// Abandoned locally
    pub fn cancel(self: &Arc<Self>) -> TransactionResult<()> {
        self.transition(TransactionState::Cancelled, None)
    }

    fn transition(
        self: &Arc<Self>,
        to: TransactionState,
        trigger: Option<Arc<M>>,
    ) -> TransactionResult<()> {
        let delivery = self.delivery.lock();

        let previous = {
            let mut lifecycle = self.lifecycle.write();
            let from = lifecycle.state;
            if !from.can_transition_to(to) {
                let err = TransactionError::InvalidTransition { id: self.id, from, to };
                warn!("{}", err);
                return Err(err);
            }
            if to == TransactionState::Initiated {
                lifecycle.initiated_at = Some(Instant::now());
            }
            lifecycle.state = to;
            from
        };

        debug!("{} transaction {}: {} -> {}", self.kind, self.id, previous, to);

        let event = TransactionEvent::new(self.clone(), trigger, previous, to);
        delivery.pending.borrow_mut().push_back(event);
        if delivery.running.replace(true) {
            // Called from a listener; the running delivery loop picks it up
            return Ok(());
        }

        loop {
            let next = delivery.pending.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.deliver(&event);
        }
        delivery.running.set(false);
        Ok(())
    }

    fn deliver(&self, event: &TransactionEvent<M>) {
        let to = event.new_state();
        let report = self.listeners.deliver(|l| l.on_state_changed(event));
        if !report.is_clean() {
            warn!(
                "Transaction {}: {} of {} listeners failed on {}",
                self.id,
                report.failed,
                report.delivered + report.failed,
                to
            );
        }

        if to.is_terminal() {
            self.listeners.clear();
            if let Some(dialog) = &self.dialog {
                dialog.detach_transaction(&self.id);
            }
        }
    }
}

impl<M> fmt::Debug for Transaction<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("dialog", &self.dialog.as_ref().map(|d| d.id()))
            .field("listeners", &self.listeners)
            .finish()
    }
}
