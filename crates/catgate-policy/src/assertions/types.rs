//! Core types for assertions.

use std::fmt;
use std::path::PathBuf;

use catgate_core::types::{scalar_string, ResourceRef};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// What an assertion inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// A catalog resource, written `Type[title]`.
    Resource { reference: String },
    /// A declared class.
    Class { name: String },
    /// A `User` resource, looked up by its name.
    User { name: String },
    /// A network port.
    Port {
        #[serde(deserialize_with = "scalar")]
        number: String,
    },
    /// A node fact; dotted names reach into structured facts.
    Fact { name: String },
}

impl Subject {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User { name: name.into() }
    }

    pub fn port(number: impl Into<String>) -> Self {
        Self::Port {
            number: number.into(),
        }
    }

    /// The name, reference, or number the subject is keyed by.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Resource { reference } => reference,
            Self::Class { name } | Self::User { name } | Self::Fact { name } => name,
            Self::Port { number } => number,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource { reference } => write!(f, "resource {reference}"),
            Self::Class { name } => write!(f, "class '{name}'"),
            Self::User { name } => write!(f, "user '{name}'"),
            Self::Port { number } => write!(f, "port '{number}'"),
            Self::Fact { name } => write!(f, "fact '{name}'"),
        }
    }
}

/// The condition checked against a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    Exist,
    HaveUid {
        #[serde(deserialize_with = "scalar")]
        uid: String,
    },
    /// Exact membership by primary or secondary group.
    BelongToGroup {
        #[serde(deserialize_with = "scalar")]
        group: String,
    },
    /// Membership in any group whose identifier matches a regex.
    BelongToGroupMatching { pattern: String },
    HaveHomeDirectory { path: String },
    HaveLoginShell { shell: String },
    BeListening,
    /// Resource attribute is declared, and equals `value` when given.
    HaveAttribute {
        name: String,
        #[serde(default)]
        value: Option<Value>,
    },
    Equal { value: Value },
    Match { pattern: String },
}

impl Matcher {
    /// Short snake_case name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exist => "exist",
            Self::HaveUid { .. } => "have_uid",
            Self::BelongToGroup { .. } => "belong_to_group",
            Self::BelongToGroupMatching { .. } => "belong_to_group_matching",
            Self::HaveHomeDirectory { .. } => "have_home_directory",
            Self::HaveLoginShell { .. } => "have_login_shell",
            Self::BeListening => "be_listening",
            Self::HaveAttribute { .. } => "have_attribute",
            Self::Equal { .. } => "equal",
            Self::Match { .. } => "match",
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exist => f.write_str("exist"),
            Self::HaveUid { uid } => write!(f, "have uid '{uid}'"),
            Self::BelongToGroup { group } => write!(f, "belong to group '{group}'"),
            Self::BelongToGroupMatching { pattern } => {
                write!(f, "belong to a group matching '{pattern}'")
            }
            Self::HaveHomeDirectory { path } => write!(f, "have home directory '{path}'"),
            Self::HaveLoginShell { shell } => write!(f, "have login shell '{shell}'"),
            Self::BeListening => f.write_str("be listening"),
            Self::HaveAttribute { name, value: None } => write!(f, "have attribute '{name}'"),
            Self::HaveAttribute {
                name,
                value: Some(value),
            } => write!(f, "have attribute '{name}' set to {}", render_value(value)),
            Self::Equal { value } => write!(f, "equal {}", render_value(value)),
            Self::Match { pattern } => write!(f, "match '{pattern}'"),
        }
    }
}

/// A structured check: subject, matcher, and polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub subject: Subject,
    pub matcher: Matcher,
    #[serde(default)]
    pub negate: bool,
}

impl Check {
    pub fn should(subject: Subject, matcher: Matcher) -> Self {
        Self {
            subject,
            matcher,
            negate: false,
        }
    }

    pub fn should_not(subject: Subject, matcher: Matcher) -> Self {
        Self {
            subject,
            matcher,
            negate: true,
        }
    }

    /// `expected user 'root' not to have uid '0'`
    pub fn expectation(&self) -> String {
        let polarity = if self.negate { "not to" } else { "to" };
        format!("expected {} {} {}", self.subject, polarity, self.matcher)
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let polarity = if self.negate { "should not" } else { "should" };
        write!(f, "{} {} {}", self.subject, polarity, self.matcher)
    }
}

/// Where an assertion came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssertionOrigin {
    /// Authored in a rule file under a rule-set location.
    Static { location: String, file: PathBuf },
    /// Synthesized by a generator from a catalog resource.
    Generated {
        generator: String,
        resource: ResourceRef,
    },
}

impl fmt::Display for AssertionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static { location, file } => write!(f, "{location}: {}", file.display()),
            Self::Generated {
                generator,
                resource,
            } => write!(f, "generator '{generator}' for {resource}"),
        }
    }
}

/// A single named check belonging to one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assertion {
    pub id: String,
    pub description: String,
    pub origin: AssertionOrigin,
    pub check: Check,
}

pub(crate) fn render_value(value: &Value) -> String {
    match scalar_string(value) {
        Some(s) => format!("'{s}'"),
        None => value.to_string(),
    }
}

/// Accept strings, numbers, and booleans for identifier-like fields
/// (`number = 443` and `number = "443"` are the same port).
fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_string(&value).ok_or_else(|| serde::de::Error::custom("expected a scalar value"))
}
