//! The capability set of a transition store.

use super::transaction::Transaction;
use std::sync::Arc;

/// Operations every transition store provides.
///
/// All operations are total: invalid input is dropped rather than reported,
/// which lets a bulk load keep the well-formed entries of a partially broken
/// source. Implementations must be safe to call from many threads at once.
pub trait TransitionRepo: Send + Sync {
    /// Store a transaction, replacing any previous one with the same key.
    fn add(&self, transaction: Transaction);

    /// Remove every transaction in every namespace.
    fn remove(&self);

    /// Remove all transactions of one namespace. An empty name is ignored.
    fn remove_namespace(&self, namespace: &str);

    /// Remove the transaction stored under the key of `transaction`.
    ///
    /// Only the namespace, current status and event are matched; the target
    /// status is ignored.
    fn remove_by_transaction(&self, transaction: &Transaction);

    /// Look up the transaction registered for `current_status` and `event`.
    fn get_target_transition(
        &self,
        namespace: &str,
        current_status: &str,
        event: &str,
    ) -> Option<Arc<Transaction>>;
}
