//! Thread-safe, namespaced transition registry.

use super::error::TransactionError;
use super::repo::TransitionRepo;
use super::transaction::{Transaction, TransitionKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type TransitionTable = HashMap<TransitionKey, Arc<Transaction>>;
type NamespaceMap = HashMap<String, TransitionTable>;

static DEFAULT_REGISTRY: OnceLock<TransitionRegistry> = OnceLock::new();

/// Get the process-wide registry, creating it on first use.
///
/// Every call returns the same instance. Code that wants an isolated table
/// should construct its own [`TransitionRegistry`] instead.
pub fn default_registry() -> &'static TransitionRegistry {
    DEFAULT_REGISTRY.get_or_init(TransitionRegistry::new)
}

/// Registry of transitions grouped by namespace.
///
/// A single reader-writer lock guards the whole namespace map. Lookups take
/// the lock in shared mode; every mutation takes it exclusively. Validation
/// happens before the lock is acquired, so critical sections only touch the
/// maps.
///
/// Namespaces never linger empty: removing the last transition of a
/// namespace removes the namespace itself.
///
/// # Example
///
/// ```rust
/// use transition_table::fsm::{Transaction, TransitionRegistry};
///
/// let registry = TransitionRegistry::new();
/// registry.add(Transaction::new("door", "closed", "open", "opened"));
///
/// let t = registry.get_target_transition("door", "closed", "open").unwrap();
/// assert_eq!(t.target_status, "opened");
/// assert!(registry.get_target_transition("door", "opened", "open").is_none());
/// ```
#[derive(Debug, Default)]
pub struct TransitionRegistry {
    namespaces: RwLock<NamespaceMap>,
}

impl TransitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the maps consistent, so a poisoned lock
    // still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, NamespaceMap> {
        self.namespaces.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NamespaceMap> {
        self.namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a transaction, or report why it was rejected.
    ///
    /// Returns the transaction previously stored under the same key, if any.
    pub fn try_add(
        &self,
        transaction: Transaction,
    ) -> Result<Option<Arc<Transaction>>, TransactionError> {
        transaction.validate()?;

        let key = transaction.key();
        let namespace = transaction.namespace.clone();
        let replaced = {
            let mut namespaces = self.write();
            namespaces
                .entry(namespace)
                .or_default()
                .insert(key, Arc::new(transaction))
        };

        Ok(replaced)
    }

    /// Store a transaction; invalid transactions are dropped.
    pub fn add(&self, transaction: Transaction) {
        let namespace = transaction.namespace.clone();
        let current = transaction.current_status.clone();
        let event = transaction.event.clone();

        match self.try_add(transaction) {
            Ok(Some(_)) => debug!(%namespace, %current, %event, "transition replaced"),
            Ok(None) => debug!(%namespace, %current, %event, "transition added"),
            Err(error) => debug!(%namespace, %current, %event, %error, "transition rejected"),
        }
    }

    /// Look up the transaction for `current_status` and `event` in `namespace`.
    pub fn get_target_transition(
        &self,
        namespace: &str,
        current_status: &str,
        event: &str,
    ) -> Option<Arc<Transaction>> {
        let key = TransitionKey::new(current_status, event);
        let namespaces = self.read();
        namespaces
            .get(namespace)
            .and_then(|table| table.get(&key))
            .cloned()
    }

    /// Remove the transaction stored under the key of `transaction`, or report
    /// why the key was rejected.
    ///
    /// Returns whether an entry was actually removed. The target status of
    /// `transaction` plays no part in matching.
    pub fn try_remove_by_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<bool, TransactionError> {
        transaction.validate_current()?;

        let key = transaction.key();
        let mut namespaces = self.write();
        let Some(table) = namespaces.get_mut(&transaction.namespace) else {
            return Ok(false);
        };

        let removed = table.remove(&key).is_some();
        if table.is_empty() {
            namespaces.remove(&transaction.namespace);
        }
        Ok(removed)
    }

    /// Remove the transaction stored under the key of `transaction`; invalid
    /// keys are ignored.
    pub fn remove_by_transaction(&self, transaction: &Transaction) {
        match self.try_remove_by_transaction(transaction) {
            Ok(removed) => debug!(
                namespace = %transaction.namespace,
                current = %transaction.current_status,
                event = %transaction.event,
                removed,
                "transition removal"
            ),
            Err(error) => debug!(
                namespace = %transaction.namespace,
                %error,
                "transition removal rejected"
            ),
        }
    }

    /// Remove every transaction of `namespace`. An empty name is ignored.
    pub fn remove_namespace(&self, namespace: &str) {
        if namespace.is_empty() {
            return;
        }

        let removed = self.write().remove(namespace);
        debug!(
            namespace,
            removed = removed.map_or(0, |table| table.len()),
            "namespace removed"
        );
    }

    /// Remove everything, leaving an empty but usable registry.
    pub fn remove(&self) {
        let cleared = std::mem::take(&mut *self.write());
        debug!(namespaces = cleared.len(), "registry cleared");
    }

    /// Total number of stored transactions.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Names of all namespaces holding at least one transaction, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of transactions stored in `namespace`.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.read().get(namespace).map_or(0, HashMap::len)
    }

    /// Take a consistent, sorted copy of the registry contents.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let guard = self.read();
        let namespaces: BTreeMap<String, Vec<Transaction>> = guard
            .iter()
            .map(|(name, table)| {
                let mut transactions: Vec<Transaction> =
                    table.values().map(|t| t.as_ref().clone()).collect();
                transactions.sort_by(|a, b| a.key().cmp(&b.key()));
                (name.clone(), transactions)
            })
            .collect();

        RegistrySnapshot {
            taken_at: Utc::now(),
            namespaces,
        }
    }
}

impl TransitionRepo for TransitionRegistry {
    fn add(&self, transaction: Transaction) {
        TransitionRegistry::add(self, transaction)
    }

    fn remove(&self) {
        TransitionRegistry::remove(self)
    }

    fn remove_namespace(&self, namespace: &str) {
        TransitionRegistry::remove_namespace(self, namespace)
    }

    fn remove_by_transaction(&self, transaction: &Transaction) {
        TransitionRegistry::remove_by_transaction(self, transaction)
    }

    fn get_target_transition(
        &self,
        namespace: &str,
        current_status: &str,
        event: &str,
    ) -> Option<Arc<Transaction>> {
        TransitionRegistry::get_target_transition(self, namespace, current_status, event)
    }
}

/// Point-in-time copy of a registry, for diagnostics and dumps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Transactions per namespace, ordered by (current status, event)
    pub namespaces: BTreeMap<String, Vec<Transaction>>,
}

impl RegistrySnapshot {
    /// Iterate over every transaction in namespace order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.namespaces.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
