use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use ims_infra_common::ListenerRegistry;

use crate::dialog::{Dialog, NotifyInfo};
use crate::transaction::{
    CompletionHooks, Transaction, TransactionEvent, TransactionListener, UnsubscribeOnCompletion,
};

/// Reads the subscription details out of a NOTIFY request
pub trait NotifyInfoExtractor<M>: Send + Sync {
    fn notify_info(&self, message: &M) -> Option<NotifyInfo>;
}

/// A NOTIFY received within a dialog
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    dialog: Arc<Dialog>,
    info: NotifyInfo,
}

impl NotifyEvent {
    pub fn new(dialog: Arc<Dialog>, info: NotifyInfo) -> Self {
        Self { dialog, info }
    }

    pub fn dialog(&self) -> &Arc<Dialog> {
        &self.dialog
    }

    pub fn info(&self) -> &NotifyInfo {
        &self.info
    }
}

/// Observer of NOTIFY requests received by the local subscriber
pub trait IncomingNotifyListener: Send + Sync {
    fn on_notify_received(&self, event: &NotifyEvent);
}

/// Registry of [`IncomingNotifyListener`]s shared by NOTIFY server listeners
pub type IncomingNotifyListeners = ListenerRegistry<dyn IncomingNotifyListener>;

/// Handles the server side of a NOTIFY transaction
///
/// Once the transaction is initiated by a NOTIFY it can read, the listener
/// stores the [`NotifyInfo`] on the dialog, unsubscribes, and then tells the
/// [`IncomingNotifyListener`]s.
pub struct NotifyServerListener<M> {
    dialog: Arc<Dialog>,
    extractor: Arc<dyn NotifyInfoExtractor<M>>,
    observers: Arc<IncomingNotifyListeners>,
    received: Mutex<Option<NotifyInfo>>,
}

impl<M: 'static> NotifyServerListener<M> {
    pub fn new(
        dialog: Arc<Dialog>,
        extractor: Arc<dyn NotifyInfoExtractor<M>>,
        observers: Arc<IncomingNotifyListeners>,
    ) -> Self {
        Self {
            dialog,
            extractor,
            observers,
            received: Mutex::new(None),
        }
    }

    /// Subscribe a NOTIFY server listener to `transaction`
    pub fn attach(
        transaction: &Transaction<M>,
        dialog: Arc<Dialog>,
        extractor: Arc<dyn NotifyInfoExtractor<M>>,
        observers: Arc<IncomingNotifyListeners>,
    ) -> Arc<UnsubscribeOnCompletion<M, Self>> {
        UnsubscribeOnCompletion::attach(transaction, Self::new(dialog, extractor, observers))
    }
}

impl<M> TransactionListener<M> for NotifyServerListener<M> {
    fn on_initiated(&self, event: &TransactionEvent<M>) {
        let Some(request) = event.trigger() else {
            return;
        };
        match self.extractor.notify_info(request) {
            Some(info) => {
                self.dialog.record_notify(info.clone());
                *self.received.lock() = Some(info);
            }
            None => warn!(
                "Transaction {}: NOTIFY without readable subscription info",
                event.transaction().id()
            ),
        }
    }
}

impl<M> CompletionHooks<M> for NotifyServerListener<M> {
    fn is_logic_complete(&self, event: &TransactionEvent<M>) -> bool {
        event.new_state().is_terminal() || self.received.lock().is_some()
    }

    fn on_unsubscribe(&self, transaction: &Transaction<M>) {
        let Some(info) = self.received.lock().take() else {
            return;
        };
        debug!(
            "NOTIFY '{}' received on {} (transaction {})",
            info.event,
            self.dialog,
            transaction.id()
        );
        let event = NotifyEvent::new(self.dialog.clone(), info);
        self.observers.deliver(|l| l.on_notify_received(&event));
    }
}

impl<M> fmt::Debug for NotifyServerListener<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyServerListener")
            .field("dialog", &self.dialog.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{InitiateParty, SubscriptionState};
    use crate::transaction::{TransactionKind, TransactionState};

    /// "NOTIFY <event> <state>" test messages
    struct LineExtractor;

    impl NotifyInfoExtractor<String> for LineExtractor {
        fn notify_info(&self, message: &String) -> Option<NotifyInfo> {
            let mut parts = message.split_whitespace();
            if parts.next()? != "NOTIFY" {
                return None;
            }
            let event = parts.next()?;
            let state = match parts.next()? {
                "active" => SubscriptionState::Active,
                "pending" => SubscriptionState::Pending,
                "terminated" => SubscriptionState::Terminated,
                _ => return None,
            };
            Some(NotifyInfo::new(event, state))
        }
    }

    #[derive(Default)]
    struct Observer(Mutex<Vec<NotifyEvent>>);

    impl IncomingNotifyListener for Observer {
        fn on_notify_received(&self, event: &NotifyEvent) {
            self.0.lock().push(event.clone());
        }
    }

    fn setup() -> (Arc<Dialog>, Arc<IncomingNotifyListeners>, Arc<Observer>) {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Remote));
        let observers = Arc::new(IncomingNotifyListeners::new("incoming-notify"));
        let observer = Arc::new(Observer::default());
        observers.subscribe(observer.clone());
        (dialog, observers, observer)
    }

    #[test]
    fn test_records_notifies_and_unsubscribes() {
        let (dialog, observers, observer) = setup();
        let tx =
            Transaction::<String>::for_dialog(TransactionKind::Notify, dialog.clone()).unwrap();
        let listener =
            NotifyServerListener::attach(&tx, dialog.clone(), Arc::new(LineExtractor), observers);

        tx.initiate("NOTIFY refer active".to_string()).unwrap();

        assert!(listener.is_unsubscribed());
        assert_eq!(tx.listener_count(), 0);
        assert_eq!(dialog.subscription_state(), SubscriptionState::Active);

        let seen = observer.0.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].info().event, "refer");
        assert_eq!(seen[0].dialog().id(), dialog.id());
        drop(seen);

        tx.complete("200 OK".to_string()).unwrap();
        assert_eq!(observer.0.lock().len(), 1);
    }

    #[test]
    fn test_unreadable_notify_waits_for_terminal_state() {
        let (dialog, observers, observer) = setup();
        let tx =
            Transaction::<String>::for_dialog(TransactionKind::Notify, dialog.clone()).unwrap();
        let listener =
            NotifyServerListener::attach(&tx, dialog.clone(), Arc::new(LineExtractor), observers);

        tx.initiate("NOTIFY refer".to_string()).unwrap();
        assert!(!listener.is_unsubscribed());

        tx.fail("400 Bad Request".to_string()).unwrap();
        assert_eq!(tx.state(), TransactionState::Failed);
        assert!(listener.is_unsubscribed());
        assert!(observer.0.lock().is_empty());
        assert_eq!(dialog.last_notify(), None);
    }
}
