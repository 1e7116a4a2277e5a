//! Dialog implementation
//!
//! All mutable dialog attributes sit behind their own `parking_lot` lock, so a
//! dialog is shared as `Arc<Dialog>` between the transactions it owns and the
//! listeners reacting to them.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

use crate::errors::{DialogError, DialogResult};
use crate::transaction::TransactionId;

use super::dialog_state::{DialogId, DialogState, InitiateParty, SubscriptionState};
use super::notify::NotifyInfo;

#[derive(Debug)]
struct Subscription {
    state: SubscriptionState,
    last_notify: Option<NotifyInfo>,
}

/// One ongoing session
pub struct Dialog {
    id: DialogId,
    call_id: String,
    initiate_party: InitiateParty,
    state: RwLock<DialogState>,
    /// Who started the outstanding reinvite, if any
    reinvite: Mutex<Option<InitiateParty>>,
    subscription: RwLock<Subscription>,
    transactions: Mutex<BTreeSet<TransactionId>>,
}

impl Dialog {
    /// Create a dialog for the initial exchange of `call_id`
    pub fn new(call_id: impl Into<String>, initiate_party: InitiateParty) -> Self {
        let dialog = Self {
            id: DialogId::new(),
            call_id: call_id.into(),
            initiate_party,
            state: RwLock::new(DialogState::Initial),
            reinvite: Mutex::new(None),
            subscription: RwLock::new(Subscription {
                state: SubscriptionState::Inactive,
                last_notify: None,
            }),
            transactions: Mutex::new(BTreeSet::new()),
        };
        debug!("Created dialog {} for call {} ({})", dialog.id, dialog.call_id, initiate_party);
        dialog
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn initiate_party(&self) -> InitiateParty {
        self.initiate_party
    }

    pub fn state(&self) -> DialogState {
        *self.state.read()
    }

    pub fn is_terminated(&self) -> bool {
        self.state() == DialogState::Terminated
    }

    /// Provisional response received
    pub fn set_early(&self) -> DialogResult<()> {
        self.advance(DialogState::Early)
    }

    /// Final success response received
    pub fn confirm(&self) -> DialogResult<()> {
        self.advance(DialogState::Confirmed)
    }

    fn advance(&self, to: DialogState) -> DialogResult<()> {
        let mut state = self.state.write();
        if *state == DialogState::Terminated {
            return Err(DialogError::Terminated { dialog: self.id });
        }
        if *state != to {
            debug!("Dialog {} state {} -> {}", self.id, *state, to);
            *state = to;
        }
        Ok(())
    }

    /// End the session; no transaction may join the dialog afterwards
    pub fn terminate(&self) {
        let mut state = self.state.write();
        if *state != DialogState::Terminated {
            debug!("Dialog {} terminated (was {})", self.id, *state);
            *state = DialogState::Terminated;
        }
    }

    /// Flag a reinvite started by `party` as outstanding
    pub fn mark_reinvite_in_progress(&self, party: InitiateParty) -> DialogResult<()> {
        if self.is_terminated() {
            return Err(DialogError::Terminated { dialog: self.id });
        }

        let mut reinvite = self.reinvite.lock();
        if let Some(initiator) = *reinvite {
            let err = DialogError::ReinviteInProgress {
                dialog: self.id,
                initiator,
            };
            warn!("{}", err);
            return Err(err);
        }
        *reinvite = Some(party);
        debug!("Dialog {}: reinvite in progress ({})", self.id, party);
        Ok(())
    }

    /// Clear the reinvite flag, returning who had set it
    pub fn unmark_reinvite_in_progress(&self) -> Option<InitiateParty> {
        let cleared = self.reinvite.lock().take();
        if let Some(party) = cleared {
            debug!("Dialog {}: reinvite by {} finished", self.id, party);
        }
        cleared
    }

    pub fn is_reinvite_in_progress(&self) -> bool {
        self.reinvite.lock().is_some()
    }

    pub fn reinvite_initiator(&self) -> Option<InitiateParty> {
        *self.reinvite.lock()
    }

    pub fn attach_transaction(&self, id: TransactionId) -> DialogResult<()> {
        // Hold the state lock so terminate() cannot slip in between check and insert
        let state = self.state.read();
        if *state == DialogState::Terminated {
            return Err(DialogError::Terminated { dialog: self.id });
        }
        self.transactions.lock().insert(id);
        Ok(())
    }

    pub fn detach_transaction(&self, id: &TransactionId) -> bool {
        self.transactions.lock().remove(id)
    }

    pub fn active_transactions(&self) -> Vec<TransactionId> {
        self.transactions.lock().iter().copied().collect()
    }

    pub fn subscription_state(&self) -> SubscriptionState {
        self.subscription.read().state
    }

    pub fn set_subscription_state(&self, state: SubscriptionState) {
        self.subscription.write().state = state;
    }

    /// Store a received NOTIFY and adopt its subscription state
    pub fn record_notify(&self, info: NotifyInfo) {
        let mut subscription = self.subscription.write();
        debug!(
            "Dialog {}: NOTIFY for '{}', subscription {} -> {}",
            self.id, info.event, subscription.state, info.subscription_state
        );
        subscription.state = info.subscription_state;
        subscription.last_notify = Some(info);
    }

    pub fn last_notify(&self) -> Option<NotifyInfo> {
        self.subscription.read().last_notify.clone()
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.id)
            .field("call_id", &self.call_id)
            .field("initiate_party", &self.initiate_party)
            .field("state", &self.state())
            .field("reinvite", &self.reinvite_initiator())
            .field("subscription", &self.subscription_state())
            .field("transactions", &self.transactions.lock().len())
            .finish()
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dialog{{id={}, call_id={}, state={}}}", self.id, self.call_id, self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reinvite_flag() {
        let dialog = Dialog::new("a84b4c76e66710@pc33.example.com", InitiateParty::Local);
        assert!(!dialog.is_reinvite_in_progress());

        dialog.mark_reinvite_in_progress(InitiateParty::Remote).unwrap();
        assert_eq!(dialog.reinvite_initiator(), Some(InitiateParty::Remote));

        let err = dialog.mark_reinvite_in_progress(InitiateParty::Local).unwrap_err();
        assert_eq!(
            err,
            DialogError::ReinviteInProgress {
                dialog: dialog.id(),
                initiator: InitiateParty::Remote,
            }
        );

        assert_eq!(dialog.unmark_reinvite_in_progress(), Some(InitiateParty::Remote));
        assert_eq!(dialog.unmark_reinvite_in_progress(), None);
        assert!(!dialog.is_reinvite_in_progress());
    }

    #[test]
    fn test_state_progression_and_termination() {
        let dialog = Dialog::new("call@host", InitiateParty::Remote);
        assert_eq!(dialog.state(), DialogState::Initial);
        dialog.set_early().unwrap();
        dialog.confirm().unwrap();
        assert_eq!(dialog.state(), DialogState::Confirmed);

        dialog.terminate();
        dialog.terminate();
        assert!(dialog.is_terminated());
        assert!(dialog.confirm().is_err());
        assert!(dialog.mark_reinvite_in_progress(InitiateParty::Local).is_err());
        assert!(dialog.attach_transaction(TransactionId::new()).is_err());
    }

    #[test]
    fn test_record_notify() {
        let dialog = Dialog::new("call@host", InitiateParty::Local);
        dialog.set_subscription_state(SubscriptionState::Pending);

        let info = NotifyInfo::new("refer", SubscriptionState::Active)
            .with_expires(60)
            .with_body("message/sipfrag", &b"SIP/2.0 200 OK"[..]);
        dialog.record_notify(info.clone());

        assert_eq!(dialog.subscription_state(), SubscriptionState::Active);
        assert_eq!(dialog.last_notify(), Some(info));
    }

    #[test]
    fn test_concurrent_reinvite_marks_admit_one() {
        let dialog = Arc::new(Dialog::new("call@host", InitiateParty::Local));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dialog = dialog.clone();
                std::thread::spawn(move || {
                    dialog.mark_reinvite_in_progress(InitiateParty::Local).is_ok()
                })
            })
            .collect();

        let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
        assert_eq!(winners, 1);
    }
}
