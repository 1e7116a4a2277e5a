//! # IMS Dialog Core
//!
//! Dialog and transaction lifecycle management for the IMS core.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────┐      owns ids of      ┌──────────────────┐
//! │       Dialog           │◄──────────────────────│  Transaction<M>  │
//! │ reinvite flag, NOTIFY  │                       │ state machine    │
//! │ sub-state, state       │   listeners mutate    │ listener registry│
//! └────────────────────────┘◄───────────────────── └──────────────────┘
//!                                                          ▲
//!                                              tracked by  │
//!                                           TransactionManager<M>
//! ```
//!
//! Every transition of a [`Transaction`] is delivered as a
//! [`TransactionEvent`] to its [`TransactionListener`]s. Listeners such as
//! [`ReinviteInProgressListener`] and [`NotifyServerListener`] are wrapped in
//! [`UnsubscribeOnCompletion`], which removes them from the transaction once
//! their work is done and runs their cleanup exactly once.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use ims_dialog_core::{
//!     Dialog, InitiateParty, ReinviteInProgressListener, TransactionKind, TransactionManager,
//! };
//!
//! let manager = TransactionManager::<String>::new();
//! let dialog = Arc::new(Dialog::new("a84b4c76e66710@pc33.example.com", InitiateParty::Local));
//!
//! let reinvite = manager.create(TransactionKind::ReInvite, Some(dialog.clone())).unwrap();
//! ReinviteInProgressListener::attach(&reinvite, dialog.clone(), InitiateParty::Local);
//!
//! reinvite.initiate("INVITE".to_string()).unwrap();
//! assert!(dialog.is_reinvite_in_progress());
//!
//! reinvite.complete("200 OK".to_string()).unwrap();
//! assert!(!dialog.is_reinvite_in_progress());
//! ```

pub mod dialog;
pub mod errors;
pub mod listeners;
pub mod transaction;

pub use dialog::{Dialog, DialogId, DialogState, InitiateParty, NotifyInfo, SubscriptionState};
pub use errors::{DialogError, DialogResult, TransactionError, TransactionResult};
pub use listeners::{
    IncomingNotifyListener, IncomingNotifyListeners, NotifyEvent, NotifyInfoExtractor,
    NotifyServerListener, ReinviteInProgressListener,
};
pub use transaction::{
    CompletionHooks, Transaction, TransactionEvent, TransactionId, TransactionKind,
    TransactionListener, TransactionManager, TransactionState, UnsubscribeOnCompletion,
};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{
        CompletionHooks, Dialog, DialogError, InitiateParty, Transaction, TransactionError,
        TransactionEvent, TransactionKind, TransactionListener, TransactionManager,
        TransactionState, UnsubscribeOnCompletion,
    };
}
