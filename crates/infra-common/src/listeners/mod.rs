//! Listener registry shared by every observer contract in the stack
//!
//! A [`ListenerRegistry`] holds `Arc`-shared listeners, usually trait objects
//! such as `ListenerRegistry<dyn RouterListener>`. Membership is by identity:
//! subscribing the same `Arc` twice is a no-op, and so is unsubscribing a
//! listener that is not registered.
//!
//! ## Delivery
//!
//! [`ListenerRegistry::deliver`] takes a snapshot of the subscribers before
//! invoking any callback and releases the lock, so a callback may subscribe
//! or unsubscribe (itself included) without deadlocking or disturbing the
//! delivery in progress. Changes become visible with the next delivery.
//!
//! A panicking listener is isolated: the panic is caught and logged, and the
//! remaining listeners still receive the event.

use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::error;

/// Outcome of one delivery round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Listeners whose callback returned normally
    pub delivered: usize,
    /// Listeners whose callback panicked
    pub failed: usize,
}

impl DeliveryReport {
    /// True if every listener in the snapshot handled the event
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Identity-keyed, snapshot-delivering set of listeners
pub struct ListenerRegistry<L: ?Sized> {
    name: &'static str,
    listeners: RwLock<Vec<Arc<L>>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create an empty registry; `name` only appears in log output
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener
    ///
    /// Returns `false` if this exact listener instance was already registered.
    pub fn subscribe(&self, listener: Arc<L>) -> bool {
        let mut listeners = self.listeners.write();
        let addr = data_addr(&*listener);
        if listeners.iter().any(|l| data_addr(&**l) == addr) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove a listener by identity
    ///
    /// Accepts a plain reference so a listener can remove itself from inside
    /// its own callback (`registry.unsubscribe(self)`), whether or not the
    /// reference has been coerced to `L`. Returns `false` if it was not
    /// registered.
    pub fn unsubscribe<T: ?Sized>(&self, listener: &T) -> bool {
        let addr = data_addr(listener);
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| data_addr(&**l) != addr);
        listeners.len() != before
    }

    /// Whether this exact listener instance is registered
    pub fn contains<T: ?Sized>(&self, listener: &T) -> bool {
        let addr = data_addr(listener);
        self.listeners.read().iter().any(|l| data_addr(&**l) == addr)
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Drop every registered listener
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    /// Point-in-time copy of the registered listeners, in subscription order
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners.read().clone()
    }

    /// Invoke `callback` on every listener registered at the time of the call
    pub fn deliver<F>(&self, mut callback: F) -> DeliveryReport
    where
        F: FnMut(&L),
    {
        let mut report = DeliveryReport::default();
        for listener in self.snapshot() {
            match catch_unwind(AssertUnwindSafe(|| callback(&*listener))) {
                Ok(()) => report.delivered += 1,
                Err(panic) => {
                    report.failed += 1;
                    error!(
                        "Listener in registry '{}' panicked during delivery: {}",
                        self.name,
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
        report
    }
}

impl<L: ?Sized> fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("name", &self.name)
            .field("listeners", &self.len())
            .finish()
    }
}

// Trait object pointers carry a vtable, so identity compares the data address only.
fn data_addr<T: ?Sized>(listener: &T) -> *const () {
    listener as *const T as *const ()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
