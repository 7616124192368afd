//! Validation errors for transactions.

use thiserror::Error;

/// Reasons a transaction is rejected by the registry.
///
/// Both kinds describe rejected input only; the registry state is never
/// affected by a failed validation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The transaction is absent, or its namespace, current status or event is empty.
    #[error("invalid transaction")]
    InvalidTransaction,

    /// The key fields are present but the target status is empty.
    #[error("empty target status")]
    EmptyTargetStatus,
}
