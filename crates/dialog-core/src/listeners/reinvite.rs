use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::dialog::{Dialog, InitiateParty};
use crate::transaction::{
    CompletionHooks, Transaction, TransactionEvent, TransactionListener, UnsubscribeOnCompletion,
};

/// Keeps the dialog's reinvite flag set while a reinvite transaction runs
///
/// The flag is set when the transaction is initiated and cleared when the
/// listener unsubscribes, whichever terminal state the transaction reaches.
/// A flag this listener did not set (because another reinvite already held
/// it) is left alone.
#[derive(Debug)]
pub struct ReinviteInProgressListener {
    dialog: Arc<Dialog>,
    party: InitiateParty,
    marked: AtomicBool,
}

impl ReinviteInProgressListener {
    pub fn new(dialog: Arc<Dialog>, party: InitiateParty) -> Self {
        Self {
            dialog,
            party,
            marked: AtomicBool::new(false),
        }
    }

    /// Subscribe a listener for `party`'s reinvite to `transaction`
    pub fn attach<M: 'static>(
        transaction: &Transaction<M>,
        dialog: Arc<Dialog>,
        party: InitiateParty,
    ) -> Arc<UnsubscribeOnCompletion<M, Self>> {
        UnsubscribeOnCompletion::attach(transaction, Self::new(dialog, party))
    }

    /// Whether this listener currently holds the dialog's flag
    pub fn has_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }
}

impl<M> TransactionListener<M> for ReinviteInProgressListener {
    fn on_initiated(&self, event: &TransactionEvent<M>) {
        match self.dialog.mark_reinvite_in_progress(self.party) {
            Ok(()) => self.marked.store(true, Ordering::Release),
            Err(e) => warn!("Transaction {} not marking reinvite: {}", event.transaction().id(), e),
        }
    }
}

impl<M> CompletionHooks<M> for ReinviteInProgressListener {
    fn on_unsubscribe(&self, transaction: &Transaction<M>) {
        if self.marked.swap(false, Ordering::AcqRel) {
            debug!(
                "Clearing reinvite status of {} after transaction {}",
                self.dialog,
                transaction.id()
            );
            self.dialog.unmark_reinvite_in_progress();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;

    fn reinvite(dialog: &Arc<Dialog>) -> Arc<Transaction<String>> {
        Transaction::for_dialog(TransactionKind::ReInvite, dialog.clone()).unwrap()
    }

    #[test]
    fn test_flag_spans_transaction() {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Local));
        let tx = reinvite(&dialog);
        let listener =
            ReinviteInProgressListener::attach(&tx, dialog.clone(), InitiateParty::Local);

        tx.initiate("INVITE".to_string()).unwrap();
        assert!(dialog.is_reinvite_in_progress());
        assert!(listener.inner().has_marked());

        tx.fail("488 Not Acceptable Here".to_string()).unwrap();
        assert!(!dialog.is_reinvite_in_progress());
        assert!(listener.is_unsubscribed());
    }

    /// Answers the reinvite synchronously from inside the Initiated callback
    struct ImmediateAnswer;

    impl TransactionListener<String> for ImmediateAnswer {
        fn on_initiated(&self, event: &TransactionEvent<String>) {
            event.transaction().complete("200 OK".to_string()).unwrap();
        }
    }

    #[test]
    fn test_flag_cleared_when_completed_from_earlier_listener() {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Local));
        let tx = reinvite(&dialog);
        tx.subscribe(Arc::new(ImmediateAnswer));
        let listener =
            ReinviteInProgressListener::attach(&tx, dialog.clone(), InitiateParty::Local);

        tx.initiate("INVITE".to_string()).unwrap();

        assert_eq!(tx.state(), crate::transaction::TransactionState::Completed);
        assert!(listener.is_unsubscribed());
        assert!(!listener.inner().has_marked());
        assert!(!dialog.is_reinvite_in_progress());
        assert!(dialog.mark_reinvite_in_progress(InitiateParty::Remote).is_ok());
    }

    #[test]
    fn test_cancel_before_initiation_leaves_flag_untouched() {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Local));
        let tx = reinvite(&dialog);
        ReinviteInProgressListener::attach(&tx, dialog.clone(), InitiateParty::Local);

        tx.cancel().unwrap();
        assert!(!dialog.is_reinvite_in_progress());
        assert_eq!(tx.listener_count(), 0);
    }

    #[test]
    fn test_does_not_clear_foreign_flag() {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Local));
        let first = reinvite(&dialog);
        let second = reinvite(&dialog);
        ReinviteInProgressListener::attach(&first, dialog.clone(), InitiateParty::Remote);
        let loser =
            ReinviteInProgressListener::attach(&second, dialog.clone(), InitiateParty::Local);

        first.initiate("INVITE".to_string()).unwrap();
        second.initiate("INVITE".to_string()).unwrap();
        assert!(!loser.inner().has_marked());

        second.complete("491 Request Pending".to_string()).unwrap();
        assert_eq!(dialog.reinvite_initiator(), Some(InitiateParty::Remote));

        first.complete("200 OK".to_string()).unwrap();
        assert!(!dialog.is_reinvite_in_progress());
    }
}
