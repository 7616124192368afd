//! Bulk loading of transitions from configuration.
//!
//! The expected layout is:
//!
//! ```yaml
//! fsm:
//!   <namespace>:
//!     <entry>:
//!       current: <status>
//!       event: <event>
//!       target: <status>
//! ```
//!
//! Entry names only group fields and are not stored. Entries with missing or
//! empty fields are skipped; only an unreadable or unparsable source fails
//! the load.

use super::registry::default_registry;
use super::repo::TransitionRepo;
use super::transaction::Transaction;
use crate::config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Root key of the transition subtree.
pub const FSM_ROOT: &str = "fsm";

/// Read access to a nested key-value source, addressed by path segments.
pub trait KeyValueSource {
    /// Child keys of the map at `path`; empty when `path` is missing or not a map.
    fn keys_at(&self, path: &[&str]) -> Vec<String>;

    /// String leaf at `path`.
    fn string_at(&self, path: &[&str]) -> Option<String>;
}

impl KeyValueSource for Config {
    fn keys_at(&self, path: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = self
            .get_value_at(path)
            .and_then(|value| value.as_object())
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn string_at(&self, path: &[&str]) -> Option<String> {
        self.get_value_at(path)?.as_str().map(str::to_string)
    }
}

/// Outcome of a bulk load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Entries accepted by the registry
    pub loaded: usize,
    /// Entries dropped by validation
    pub skipped: usize,
}

/// Add every transition found under `fsm` in `source` to `repo`.
///
/// Namespaces and entries are visited in sorted key order, so when two
/// entries of a namespace share a key the later one in that order wins.
pub fn load_transactions<S, R>(source: &S, repo: &R) -> LoadReport
where
    S: KeyValueSource + ?Sized,
    R: TransitionRepo + ?Sized,
{
    let mut report = LoadReport::default();

    for namespace in source.keys_at(&[FSM_ROOT]) {
        for entry in source.keys_at(&[FSM_ROOT, namespace.as_str()]) {
            let field = |name: &str| {
                source
                    .string_at(&[FSM_ROOT, namespace.as_str(), entry.as_str(), name])
                    .unwrap_or_default()
            };
            let transaction = Transaction::new(
                namespace.as_str(),
                field("current"),
                field("event"),
                field("target"),
            );

            // The registry applies the same rules; checking here only feeds the report.
            let outcome = transaction.validate();
            repo.add(transaction);
            match outcome {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    warn!(%namespace, %entry, %error, "skipping transition entry");
                    report.skipped += 1;
                }
            }
        }
    }

    report
}

/// Load transitions from a config file into `repo`.
///
/// Fails only if the file cannot be read or parsed.
pub fn load_transactions_from_file<R>(
    path: impl AsRef<Path>,
    repo: &R,
) -> Result<LoadReport, ConfigError>
where
    R: TransitionRepo + ?Sized,
{
    let path = path.as_ref();
    let config = Config::new(path)?;
    let report = load_transactions(&config, repo);
    info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "transitions loaded"
    );
    Ok(report)
}

/// Load transitions from a config file into the process-wide registry.
pub fn load_default_from_file(path: impl AsRef<Path>) -> Result<LoadReport, ConfigError> {
    load_transactions_from_file(path, default_registry())
}
