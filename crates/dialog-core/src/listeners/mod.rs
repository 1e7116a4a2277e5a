//! Transaction listeners that keep dialog state in step with transactions

pub mod notify;
pub mod reinvite;

pub use notify::{
    IncomingNotifyListener, IncomingNotifyListeners, NotifyEvent, NotifyInfoExtractor,
    NotifyServerListener,
};
pub use reinvite::ReinviteInProgressListener;
