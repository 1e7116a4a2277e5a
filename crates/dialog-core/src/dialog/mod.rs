//! Dialog management
//!
//! A [`Dialog`] is the per-session aggregate that transactions and their
//! listeners read and mutate.

pub mod dialog_impl;
pub mod dialog_state;
pub mod notify;

pub use dialog_impl::Dialog;
pub use dialog_state::{DialogId, DialogState, InitiateParty, SubscriptionState};
pub use notify::NotifyInfo;
