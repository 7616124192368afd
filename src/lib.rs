//! Transition table: namespaced state-transition lookup with config loading.
//!
//! The [`fsm`] module holds a thread-safe registry mapping
//! `(namespace, current status, event)` to a target status. The [`config`]
//! module reads JSON or YAML files into a dotted-key tree, and
//! [`fsm::load_transactions_from_file`] fills a registry from the `fsm`
//! section of such a file.
//!
//! # Example
//!
//! ```rust
//! use transition_table::{load_transactions, Config, ReaderType, TransitionRegistry};
//!
//! let config = Config::from_text(
//!     ReaderType::Yaml,
//!     "fsm:\n  door:\n    open:\n      current: closed\n      event: push\n      target: opened\n",
//! )
//! .unwrap();
//!
//! let registry = TransitionRegistry::new();
//! let report = load_transactions(&config, &registry);
//!
//! assert_eq!(report.loaded, 1);
//! assert_eq!(
//!     registry
//!         .get_target_transition("door", "closed", "push")
//!         .unwrap()
//!         .target_status,
//!     "opened"
//! );
//! ```

pub mod config;
pub mod fsm;

pub use config::{Config, ConfigError, ReaderType};
pub use fsm::{
    default_registry, load_transactions, load_transactions_from_file, Transaction,
    TransactionError, TransitionRegistry, TransitionRepo,
};
