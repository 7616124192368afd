//! Transaction records and their validation rules.
//!
//! A transaction describes one edge of a state table: in `namespace`, the
//! `event` moves `current_status` to `target_status`.

use super::error::TransactionError;
use serde::{Deserialize, Serialize};

/// A single registered transition.
///
/// Transactions are plain values. Once stored in a registry they are shared
/// behind an `Arc` and never mutated; replacing a transition means adding a
/// new transaction under the same key.
///
/// # Example
///
/// ```rust
/// use transition_table::fsm::Transaction;
///
/// let t = Transaction::new("orders", "created", "pay", "paid");
/// assert!(t.validate().is_ok());
/// assert_eq!(t.key().event, "pay");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Namespace the transition belongs to
    pub namespace: String,
    /// Status the transition starts from
    #[serde(rename = "current")]
    pub current_status: String,
    /// Event that triggers the transition
    pub event: String,
    /// Status the transition leads to
    #[serde(rename = "target")]
    pub target_status: String,
}

/// Composite lookup key within a namespace.
///
/// Kept as two separate fields so that a status or event containing any
/// separator-like text can never collide with another pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionKey {
    /// Status the transition starts from
    pub current_status: String,
    /// Event that triggers the transition
    pub event: String,
}

impl TransitionKey {
    /// Create a key from a current status and an event.
    pub fn new(current_status: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            current_status: current_status.into(),
            event: event.into(),
        }
    }
}

impl Transaction {
    /// Create a transaction from its four fields.
    pub fn new(
        namespace: impl Into<String>,
        current_status: impl Into<String>,
        event: impl Into<String>,
        target_status: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            current_status: current_status.into(),
            event: event.into(),
            target_status: target_status.into(),
        }
    }

    /// Create a key-only transaction, suitable for removal by key.
    pub fn key_only(
        namespace: impl Into<String>,
        current_status: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self::new(namespace, current_status, event, String::new())
    }

    /// The (current status, event) key this transaction is stored under.
    pub fn key(&self) -> TransitionKey {
        TransitionKey::new(self.current_status.as_str(), self.event.as_str())
    }

    /// Full validity, required before a transaction can be stored.
    ///
    /// The key fields are checked first, so a transaction missing both an
    /// event and a target reports `InvalidTransaction`.
    pub fn validate(&self) -> Result<(), TransactionError> {
        self.validate_current()?;

        if self.target_status.is_empty() {
            return Err(TransactionError::EmptyTargetStatus);
        }

        Ok(())
    }

    /// Key-only validity, required for removal. The target status is not checked.
    pub fn validate_current(&self) -> Result<(), TransactionError> {
        if self.namespace.is_empty() || self.current_status.is_empty() || self.event.is_empty() {
            return Err(TransactionError::InvalidTransaction);
        }
        Ok(())
    }
}

/// Fully validate a possibly absent transaction.
///
/// An absent transaction is reported as `InvalidTransaction`.
pub fn validate(transaction: Option<&Transaction>) -> Result<&Transaction, TransactionError> {
    let transaction = transaction.ok_or(TransactionError::InvalidTransaction)?;
    transaction.validate()?;
    Ok(transaction)
}

/// Validate only the key fields of a possibly absent transaction.
pub fn validate_current(
    transaction: Option<&Transaction>,
) -> Result<&Transaction, TransactionError> {
    let transaction = transaction.ok_or(TransactionError::InvalidTransaction)?;
    transaction.validate_current()?;
    Ok(transaction)
}
