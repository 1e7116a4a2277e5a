use super::event::TransactionEvent;
use super::state::TransactionState;

/// Observer of transaction state changes
///
/// Implement [`on_state_changed`](Self::on_state_changed) to see every event,
/// or only the per-state hooks it dispatches to by default.
pub trait TransactionListener<M>: Send + Sync {
    fn on_state_changed(&self, event: &TransactionEvent<M>) {
        match event.new_state() {
            TransactionState::Initiated => self.on_initiated(event),
            TransactionState::Completed => self.on_completed(event),
            TransactionState::Failed => self.on_failed(event),
            TransactionState::Cancelled => self.on_cancelled(event),
            TransactionState::Created => {}
        }
    }

    fn on_initiated(&self, _event: &TransactionEvent<M>) {}

    fn on_completed(&self, _event: &TransactionEvent<M>) {}

    fn on_failed(&self, _event: &TransactionEvent<M>) {}

    fn on_cancelled(&self, _event: &TransactionEvent<M>) {}
}
