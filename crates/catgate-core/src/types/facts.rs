//! Node facts and their wire decoding.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::scalar_string;
use crate::errors::FactsError;

/// Encodings accepted for inbound facts payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactsFormat {
    Json,
    Yaml,
}

impl FactsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for FactsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactsFormat {
    type Err = FactsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // pson is the compiler's legacy name for its JSON dialect
            "json" | "pson" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(FactsError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Immutable fact name → value mapping describing the target node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(BTreeMap<String, Value>);

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a fact.
    pub fn with_fact(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Decode a form-escaped facts payload.
    ///
    /// The payload is unescaped (`+` is a space, then percent-decoding) and
    /// parsed in the given format. A node-facts envelope with a `values`
    /// mapping yields that mapping; any other mapping is taken as the facts.
    pub fn decode(format: FactsFormat, payload: &str) -> Result<Self, FactsError> {
        let spaced = payload.replace('+', " ");
        let text = urlencoding::decode(&spaced).map_err(|e| FactsError::Unescape {
            message: e.to_string(),
        })?;

        let document: Value = match format {
            FactsFormat::Json => serde_json::from_str(&text).map_err(|e| FactsError::Decode {
                format: format.to_string(),
                message: e.to_string(),
            })?,
            FactsFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| FactsError::Decode {
                format: format.to_string(),
                message: e.to_string(),
            })?,
        };

        let map = match document {
            Value::Object(mut root) => match root.remove("values") {
                Some(Value::Object(values)) => values,
                Some(other) => {
                    root.insert("values".to_string(), other);
                    root
                }
                None => root,
            },
            other => {
                return Err(FactsError::NotAMapping {
                    found: value_kind(&other).to_string(),
                })
            }
        };

        Ok(Self(map.into_iter().collect()))
    }

    /// Look up a fact. Dotted names walk into structured facts
    /// (`os.family`), but an exact top-level match always wins.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(name) {
            return Some(value);
        }
        let mut parts = name.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_string)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Facts {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
