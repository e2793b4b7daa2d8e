//! Resources and resource references.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CatalogError;

/// Attribute mapping of a resource. Values are scalars, sequences, or nested
/// mappings exactly as the compiler emitted them.
pub type Attributes = BTreeMap<String, Value>;

/// A single declared unit of configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", deserialize_with = "deserialize_type_name")]
    pub type_name: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, rename = "parameters")]
    pub attributes: Attributes,
}

impl Resource {
    pub fn new(type_name: &str, title: impl Into<String>) -> Self {
        Self {
            type_name: normalize_type_name(type_name),
            title: title.into(),
            tags: Vec::new(),
            file: None,
            line: None,
            attributes: Attributes::new(),
        }
    }

    /// Builder: set an attribute.
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Builder: add a tag (classes tag the resources they contain).
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_ascii_lowercase());
        self
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef {
            type_name: self.type_name.clone(),
            title: self.title.clone(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Scalar attribute rendered as a string; `None` for missing, null, or
    /// structured values.
    pub fn attribute_string(&self, key: &str) -> Option<String> {
        self.attribute(key).and_then(scalar_string)
    }

    pub fn ensure(&self) -> Option<String> {
        self.attribute_string("ensure")
    }

    /// True when the resource is declared for removal.
    pub fn is_absent(&self) -> bool {
        self.ensure().is_some_and(|e| e == "absent")
    }

    /// The namevar: the `name` attribute when set, the title otherwise.
    pub fn name(&self) -> String {
        self.attribute_string("name")
            .unwrap_or_else(|| self.title.clone())
    }

    pub fn is_type(&self, type_name: &str) -> bool {
        self.type_name == normalize_type_name(type_name)
    }
}

/// `Type[title]` reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    pub type_name: String,
    pub title: String,
}

impl ResourceRef {
    pub fn new(type_name: &str, title: impl Into<String>) -> Self {
        Self {
            type_name: normalize_type_name(type_name),
            title: title.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.type_name, self.title)
    }
}

impl FromStr for ResourceRef {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidReference(s.to_string());
        let open = s.find('[').ok_or_else(invalid)?;
        if !s.ends_with(']') {
            return Err(invalid());
        }
        let type_name = s[..open].trim();
        let title = &s[open + 1..s.len() - 1];
        if type_name.is_empty() || title.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(type_name, title))
    }
}

/// Normalize a resource type name the way the compiler capitalizes it:
/// every `::` segment starts with an uppercase letter, the rest lowercase.
pub fn normalize_type_name(type_name: &str) -> String {
    type_name
        .trim()
        .split("::")
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Render a scalar value as a string. Numbers and booleans use their JSON
/// spelling; null and structured values yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn deserialize_type_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_type_name(&raw))
}
