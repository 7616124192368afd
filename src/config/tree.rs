//! Dotted-path access into a config tree.

use super::error::ConfigError;
use serde_json::{Map, Value};

/// Split a dotted key into its segments. Empty keys and empty segments
/// (`"a..b"`, `".a"`) are rejected.
pub(crate) fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::InvalidKey);
    }
    Ok(segments)
}

/// Walk `segments` down through nested maps.
///
/// Explicit nulls count as missing.
pub(crate) fn lookup<'a, S: AsRef<str>>(
    root: &'a Map<String, Value>,
    segments: &[S],
) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(first.as_ref())?;
    for segment in rest {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    (!current.is_null()).then_some(current)
}

/// Store `value` at `segments`, creating intermediate maps and replacing
/// any non-map value found on the way.
pub(crate) fn insert<S: AsRef<str>>(root: &mut Map<String, Value>, segments: &[S], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.as_ref())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }

    current.insert(last.as_ref().to_string(), value);
}
