//! `${dotted.path}` substitution.
//!
//! A string value consisting of exactly `${some.path}` is replaced by a deep
//! copy of the value stored at `some.path`, whatever its type. References may
//! point at other references or at maps that contain references; those are
//! expanded as well. A path may also run through a reference, as in
//! `${alias.port}` where `alias` is itself `${server}`.
//!
//! Each reference is expanded once per pass and reused afterwards. The number
//! of values copied through references is capped, so a small file cannot
//! expand into an arbitrarily large tree.

use super::error::ConfigError;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Most values a single pass may copy through references.
pub(crate) const MAX_EXPANDED_VALUES: usize = 1_000_000;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$\{([0-9A-Za-z_\-]+(?:\.[0-9A-Za-z_\-]+)*)\}$")
            .expect("reference pattern is valid")
    })
}

/// The dotted path referenced by `text`, if it is a reference.
pub(crate) fn reference_of(text: &str) -> Option<&str> {
    reference_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Expand every reference in `root`.
pub(crate) fn resolve_references(root: &mut Map<String, Value>) -> Result<(), ConfigError> {
    resolve_references_with_limit(root, MAX_EXPANDED_VALUES)
}

pub(crate) fn resolve_references_with_limit(
    root: &mut Map<String, Value>,
    limit: usize,
) -> Result<(), ConfigError> {
    let expanded = {
        let document: &Map<String, Value> = root;
        let mut resolver = Resolver {
            root: document,
            resolved: HashMap::new(),
            visiting: Vec::new(),
            copied: 0,
            limit,
        };

        let mut expanded = Map::new();
        for (key, value) in document {
            expanded.insert(key.clone(), resolver.expand(value, key)?);
        }
        expanded
    };
    *root = expanded;
    Ok(())
}

/// A fully expanded reference target and its value count.
struct Resolved {
    value: Value,
    size: usize,
}

struct Resolver<'a> {
    root: &'a Map<String, Value>,
    resolved: HashMap<String, Resolved>,
    visiting: Vec<String>,
    copied: usize,
    limit: usize,
}

impl<'a> Resolver<'a> {
    fn charge(&mut self, count: usize) -> Result<(), ConfigError> {
        self.copied = self.copied.saturating_add(count);
        if self.copied > self.limit {
            return Err(ConfigError::ExpansionTooLarge { limit: self.limit });
        }
        Ok(())
    }

    fn expand(&mut self, value: &Value, at: &str) -> Result<Value, ConfigError> {
        if let Some(reference) = value.as_str().and_then(reference_of) {
            return self.resolve(reference, at);
        }
        // Values outside any reference are the document itself, not copies.
        if !self.visiting.is_empty() {
            self.charge(1)?;
        }

        match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, child) in map {
                    let child_at = format!("{at}.{key}");
                    out.insert(key.clone(), self.expand(child, &child_at)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    out.push(self.expand(item, &format!("{at}.{i}"))?);
                }
                Ok(Value::Array(out))
            }
            _ => Ok(value.clone()),
        }
    }

    fn resolve(&mut self, reference: &str, at: &str) -> Result<Value, ConfigError> {
        if let Some(size) = self.resolved.get(reference).map(|r| r.size) {
            self.charge(size)?;
            return Ok(self.resolved[reference].value.clone());
        }
        if self.visiting.iter().any(|r| r == reference) {
            return Err(ConfigError::CyclicReference {
                reference: reference.to_string(),
            });
        }

        self.visiting.push(reference.to_string());
        let located = self.locate(reference, at);
        self.visiting.pop();

        let value = located?;
        self.resolved.insert(
            reference.to_string(),
            Resolved {
                size: count_values(&value),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Walk `reference` through the raw tree, stepping through any reference
    /// met on the way, then expand what it names.
    fn locate(&mut self, reference: &str, at: &str) -> Result<Value, ConfigError> {
        let missing = || ConfigError::UnresolvedReference {
            key: at.to_string(),
            reference: reference.to_string(),
        };

        let root = self.root;
        let segments: Vec<&str> = reference.split('.').collect();
        let mut current: Option<&'a Value> = None;

        for (i, segment) in segments.iter().enumerate() {
            let next = match current {
                None => root.get(*segment),
                Some(value) => value.as_object().and_then(|map| map.get(*segment)),
            }
            .ok_or_else(missing)?;

            if let Some(inner) = next.as_str().and_then(reference_of) {
                let inner_at = segments[..=i].join(".");
                let expanded = self.resolve(inner, &inner_at)?;
                let target = descend(&expanded, &segments[i + 1..])
                    .ok_or_else(missing)?
                    .clone();
                self.charge(count_values(&target))?;
                return Ok(target);
            }
            current = Some(next);
        }

        match current {
            Some(target) if !target.is_null() => self.expand(target, reference),
            _ => Err(missing()),
        }
    }
}

/// Walk `segments` down from `value`; nulls count as missing.
fn descend<'v>(value: &'v Value, segments: &[&str]) -> Option<&'v Value> {
    let mut current = value;
    for segment in segments {
        current = current.as_object()?.get(*segment)?;
    }
    (!current.is_null()).then_some(current)
}

fn count_values(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(count_values).sum::<usize>(),
        Value::Array(items) => 1 + items.iter().map(count_values).sum::<usize>(),
        _ => 1,
    }
}
