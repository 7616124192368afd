//! Format backends: turning raw text into a config tree and back.

use super::error::ConfigError;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Serialization format of a config source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderType {
    Json,
    Yaml,
    /// Recognised by suffix, but XML has no schema-less mapping onto the
    /// config tree, so parsing and dumping it fail.
    Xml,
}

impl ReaderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderType::Json => "json",
            ReaderType::Yaml => "yaml",
            ReaderType::Xml => "xml",
        }
    }

    /// Pick the reader type from a file suffix: `.json`, `.yaml`/`.yml`, `.xml`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(ReaderType::Json),
            "yaml" | "yml" => Some(ReaderType::Yaml),
            "xml" => Some(ReaderType::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for ReaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `text` into a map-rooted tree. An empty document yields an empty map.
pub(crate) fn parse(reader_type: ReaderType, text: &str) -> Result<Map<String, Value>, ConfigError> {
    let value = match reader_type {
        ReaderType::Json => serde_json::from_str(&strip_json_comments(text))?,
        ReaderType::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
            serde_json::to_value(yaml)?
        }
        ReaderType::Xml => return Err(ConfigError::UnsupportedReaderType(reader_type)),
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ConfigError::RootNotMap),
    }
}

/// Serialize a tree back into `reader_type`'s text form.
pub(crate) fn dump(reader_type: ReaderType, values: &Map<String, Value>) -> Result<Vec<u8>, ConfigError> {
    match reader_type {
        ReaderType::Json => Ok(serde_json::to_vec_pretty(values)?),
        ReaderType::Yaml => Ok(serde_yaml::to_string(values)?.into_bytes()),
        ReaderType::Xml => Err(ConfigError::UnsupportedReaderType(reader_type)),
    }
}

/// Remove `//` line comments and `/* */` block comments that sit outside
/// string literals. Line breaks ending a line comment are kept so parser
/// error positions stay meaningful.
pub(crate) fn strip_json_comments(text: &str) -> String {
    enum Mode {
        Code,
        Str { escaped: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut mode = Mode::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        mode = match mode {
            Mode::Code => match (c, next) {
                ('"', _) => {
                    out.push(c);
                    Mode::Str { escaped: false }
                }
                ('/', Some('/')) => {
                    chars.next();
                    Mode::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    Mode::BlockComment
                }
                _ => {
                    out.push(c);
                    Mode::Code
                }
            },
            Mode::Str { escaped } => {
                out.push(c);
                match c {
                    '\\' if !escaped => Mode::Str { escaped: true },
                    '"' if !escaped => Mode::Code,
                    _ => Mode::Str { escaped: false },
                }
            }
            Mode::LineComment => {
                if c == '\n' {
                    out.push(c);
                    Mode::Code
                } else {
                    Mode::LineComment
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    chars.next();
                    Mode::Code
                } else {
                    Mode::BlockComment
                }
            }
        };
    }

    out
}
