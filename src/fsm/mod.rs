//! Namespaced transition tables.
//!
//! A transition is identified by `(namespace, current status, event)` and maps
//! to a target status. Namespaces are fully isolated from one another, so
//! several state machines can share one registry.
//!
//! # Example
//!
//! ```rust
//! use transition_table::fsm::{Transaction, TransitionRegistry};
//!
//! let registry = TransitionRegistry::new();
//! registry.add(Transaction::new("order", "created", "pay", "paid"));
//!
//! let found = registry
//!     .get_target_transition("order", "created", "pay")
//!     .unwrap();
//! assert_eq!(found.target_status, "paid");
//! assert!(registry.get_target_transition("invoice", "created", "pay").is_none());
//! ```

mod error;
mod loader;
mod registry;
mod repo;
mod transaction;

pub use error::TransactionError;
pub use loader::{
    load_default_from_file, load_transactions, load_transactions_from_file, KeyValueSource,
    LoadReport, FSM_ROOT,
};
pub use registry::{default_registry, RegistrySnapshot, TransitionRegistry};
pub use repo::TransitionRepo;
pub use transaction::{validate, validate_current, Transaction, TransitionKey};
