//! Hierarchical key-value configuration.
//!
//! A [`Config`] holds a map-rooted tree of tagged values (`serde_json::Value`)
//! parsed from JSON or YAML. Values are addressed with dotted keys such as
//! `"server.http.port"`, and typed getters convert leaves on read.
//!
//! # Features
//!
//! - **Backends**: JSON (with `//` and `/* */` comments) and YAML, chosen by
//!   file suffix or explicitly
//! - **References**: a string value `"${a.b.c}"` is replaced at load time by a
//!   copy of the value at `a.b.c`
//! - **Deep copies**: `Config` is an owned tree, so `clone()` never shares state
//!
//! # Example
//!
//! ```rust
//! use transition_table::config::{Config, ReaderType};
//!
//! let config = Config::from_text(
//!     ReaderType::Yaml,
//!     "server:\n  host: localhost\n  port: 8080\nprimary: ${server.host}\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.get_int("server.port"), Some(8080));
//! assert_eq!(config.get_string("primary").as_deref(), Some("localhost"));
//! assert_eq!(config.get_string_or("server.missing", "none"), "none");
//! ```

mod error;
mod formats;
mod interpolate;
mod reader;
mod tree;

pub use error::ConfigError;
pub use formats::{parse_byte_size, parse_duration};
pub use reader::ReaderType;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// A parsed configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    reader_type: ReaderType,
    values: Map<String, Value>,
}

impl Config {
    /// Load a config file, picking the format from its suffix.
    ///
    /// An empty path is rejected with [`ConfigError::InvalidFilePath`].
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(ConfigError::InvalidFilePath);
        }
        Self::from_file(path)
    }

    /// Load a config file, picking the format from its suffix.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader_type = ReaderType::from_path(path)
            .ok_or_else(|| ConfigError::UnknownSuffix(path.to_path_buf()))?;
        if reader_type == ReaderType::Xml {
            return Err(ConfigError::UnsupportedReaderType(reader_type));
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), %reader_type, "loading config file");
        Self::from_text(reader_type, &text)
    }

    /// Parse config text in the given format.
    pub fn from_text(reader_type: ReaderType, text: &str) -> Result<Self, ConfigError> {
        let values = reader::parse(reader_type, text)?;
        Self::from_values(reader_type, values)
    }

    /// Build a config from any serializable value whose form is a map.
    pub fn from_struct<T: Serialize + ?Sized>(
        reader_type: ReaderType,
        value: &T,
    ) -> Result<Self, ConfigError> {
        if reader_type == ReaderType::Xml {
            return Err(ConfigError::UnsupportedReaderType(reader_type));
        }
        match serde_json::to_value(value)? {
            Value::Object(values) => Self::from_values(reader_type, values),
            _ => Err(ConfigError::RootNotMap),
        }
    }

    fn from_values(
        reader_type: ReaderType,
        mut values: Map<String, Value>,
    ) -> Result<Self, ConfigError> {
        interpolate::resolve_references(&mut values)?;
        Ok(Self {
            reader_type,
            values,
        })
    }

    /// An empty config that dumps as `reader_type`.
    pub fn empty(reader_type: ReaderType) -> Self {
        Self {
            reader_type,
            values: Map::new(),
        }
    }

    pub fn reader_type(&self) -> ReaderType {
        self.reader_type
    }

    /// The whole tree.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Top-level keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Raw value at a dotted key. Missing keys, nulls and invalid keys yield `None`.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        let segments = tree::split_key(key).ok()?;
        tree::lookup(&self.values, &segments[..])
    }

    /// Raw value at a path of literal segments, which may themselves contain dots.
    pub fn get_value_at<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        tree::lookup(&self.values, segments)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_value(key)?.as_str().map(str::to_string)
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// Booleans, or the strings `"on"`/`"true"` (any case) as `true` and any
    /// other string as `false`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        value_to_bool(self.get_value(key)?)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Integers, floats (truncated) or numeric strings.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        value_to_int(self.get_value(key)?)
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// Numbers or numeric strings.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        value_to_float(self.get_value(key)?)
    }

    pub fn get_float_or(&self, key: &str, default: f64) -> f64 {
        self.get_float(key).unwrap_or(default)
    }

    pub fn get_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.get_value(key)?.as_array()
    }

    /// A list of strings; `None` if any element is not a string.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get_list(key)?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn get_bool_list(&self, key: &str) -> Option<Vec<bool>> {
        self.get_list(key)?.iter().map(Value::as_bool).collect()
    }

    pub fn get_int_list(&self, key: &str) -> Option<Vec<i64>> {
        self.get_list(key)?.iter().map(value_to_int).collect()
    }

    pub fn get_float_list(&self, key: &str) -> Option<Vec<f64>> {
        self.get_list(key)?.iter().map(value_to_float).collect()
    }

    /// A duration written as `"10s"`, `"500 ms"`, `"1.5h"`, `"2 days"`.
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        parse_duration(self.get_value(key)?.as_str()?)
    }

    pub fn get_duration_or(&self, key: &str, default: Duration) -> Duration {
        self.get_duration(key).unwrap_or(default)
    }

    /// A byte count written as a number or as `"1k"`, `"10mb"`, `"2 GiB"`.
    pub fn get_byte_size(&self, key: &str) -> Option<u128> {
        match self.get_value(key)? {
            Value::Number(n) => n.as_u64().map(u128::from),
            Value::String(s) => parse_byte_size(s),
            _ => None,
        }
    }

    pub fn get_map(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get_value(key)?.as_object()
    }

    /// A config holding only `key`, as `{key: value}`.
    pub fn get_config(&self, key: &str) -> Option<Config> {
        let value = self.get_value(key)?.clone();
        let mut values = Map::new();
        values.insert(key.to_string(), value);
        Some(Self {
            reader_type: self.reader_type,
            values,
        })
    }

    /// A config rooted at the map stored under `key`.
    ///
    /// Yields an empty config when `key` is missing or not a map.
    pub fn values_config(&self, key: &str) -> Config {
        Self {
            reader_type: self.reader_type,
            values: self.get_map(key).cloned().unwrap_or_default(),
        }
    }

    /// Deserialize the subtree at `key` into `T`.
    pub fn to_object<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let segments = tree::split_key(key)?;
        let value = tree::lookup(&self.values, &segments[..])
            .cloned()
            .unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Store `value` under `key`, creating intermediate maps as needed.
    ///
    /// References inside `value` are stored verbatim, not expanded.
    pub fn set_key_value(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let segments = tree::split_key(key)?;
        tree::insert(&mut self.values, &segments[..], value.into());
        Ok(())
    }

    /// Serialize the tree in this config's format.
    pub fn dump(&self) -> Result<Vec<u8>, ConfigError> {
        reader::dump(self.reader_type, &self.values)
    }
}

fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(s.eq_ignore_ascii_case("on") || s.eq_ignore_ascii_case("true")),
        _ => None,
    }
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(truncate_to_i64),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_to_i64))
        }
        _ => None,
    }
}

/// `None` for NaN and for values outside the `i64` range.
fn truncate_to_i64(f: f64) -> Option<i64> {
    let f = f.trunc();
    // 2^63 is exact as an f64; i64::MAX is not.
    (f >= i64::MIN as f64 && f < 9_223_372_036_854_775_808.0).then_some(f as i64)
}

fn value_to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
