//! Transaction lifecycle
//!
//! A [`Transaction`] moves through [`TransactionState`]s and tells its
//! [`TransactionListener`]s about every transition. Listeners that only
//! matter until some condition is met are wrapped in
//! [`UnsubscribeOnCompletion`]. The [`TransactionManager`] tracks live
//! transactions and expires the ones that never got a final response.

pub mod adapter;
pub mod event;
pub mod listener;
pub mod manager;
pub mod state;
pub mod transaction;

pub use adapter::{CompletionHooks, UnsubscribeOnCompletion};
pub use event::TransactionEvent;
pub use listener::TransactionListener;
pub use manager::TransactionManager;
pub use state::{TransactionId, TransactionKind, TransactionState};
pub use transaction::Transaction;
