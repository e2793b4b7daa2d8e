//! Predicate evaluation for structured checks.
//!
//! Every check reads the catalog and facts through an `ExecutionContext`;
//! nothing here mutates either. The outcome reports whether the subject
//! satisfies the matcher (before polarity is applied) and what was observed,
//! which becomes the failure detail.

use catgate_core::constants::LISTENING_PORTS_FACT;
use catgate_core::errors::AssertionError;
use catgate_core::types::{scalar_string, Resource, ResourceRef};
use regex::Regex;
use serde_json::Value;

use super::types::{render_value, Check, Matcher, Subject};
use crate::engine::ExecutionContext;

/// Result of evaluating a check's matcher against its subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the subject satisfies the matcher, ignoring `negate`.
    pub satisfied: bool,
    /// What was actually found, for failure messages.
    pub observed: String,
}

impl CheckOutcome {
    fn new(satisfied: bool, observed: impl Into<String>) -> Self {
        Self {
            satisfied,
            observed: observed.into(),
        }
    }

    fn unsatisfied(observed: impl Into<String>) -> Self {
        Self::new(false, observed)
    }

    /// Whether the check passes once polarity is applied.
    pub fn holds(&self, negate: bool) -> bool {
        self.satisfied != negate
    }
}

/// Evaluate a check against the catalog and facts of one run.
pub fn evaluate(check: &Check, ctx: &ExecutionContext<'_>) -> Result<CheckOutcome, AssertionError> {
    let matcher = &check.matcher;
    match &check.subject {
        Subject::Resource { reference } => evaluate_resource(&check.subject, reference, matcher, ctx),
        Subject::Class { name } => match matcher {
            Matcher::Exist => Ok(if ctx.catalog().has_class(name) {
                CheckOutcome::new(true, "class is declared")
            } else {
                CheckOutcome::unsatisfied("class is not declared")
            }),
            _ => Err(unsupported(&check.subject, matcher)),
        },
        Subject::User { name } => evaluate_user(&check.subject, name, matcher, ctx),
        Subject::Port { number } => match matcher {
            Matcher::BeListening => Ok(port_listening(number, ctx)),
            _ => Err(unsupported(&check.subject, matcher)),
        },
        Subject::Fact { name } => evaluate_fact(&check.subject, name, matcher, ctx),
    }
}

fn evaluate_resource(
    subject: &Subject,
    reference: &str,
    matcher: &Matcher,
    ctx: &ExecutionContext<'_>,
) -> Result<CheckOutcome, AssertionError> {
    let reference: ResourceRef = reference.parse()?;
    let found = ctx.catalog().resource(&reference);
    match matcher {
        Matcher::Exist => Ok(existence(found)),
        Matcher::HaveAttribute { name, value } => {
            let Some(resource) = found else {
                return Ok(CheckOutcome::unsatisfied(format!("{reference} is not declared")));
            };
            Ok(match (resource.attribute(name), value) {
                (None, _) => CheckOutcome::unsatisfied(format!("attribute '{name}' is not declared")),
                (Some(actual), None) => CheckOutcome::new(
                    true,
                    format!("attribute '{name}' is {}", render_value(actual)),
                ),
                (Some(actual), Some(expected)) => CheckOutcome::new(
                    values_equal(actual, expected),
                    format!("attribute '{name}' is {}", render_value(actual)),
                ),
            })
        }
        _ => Err(unsupported(subject, matcher)),
    }
}

fn evaluate_user(
    subject: &Subject,
    name: &str,
    matcher: &Matcher,
    ctx: &ExecutionContext<'_>,
) -> Result<CheckOutcome, AssertionError> {
    let user = ctx
        .catalog()
        .resources_of_type("User")
        .find(|r| r.name() == name);
    // Only `ensure => present` creates the account.
    let present = user.filter(|r| r.ensure().as_deref() == Some("present"));

    match matcher {
        Matcher::Exist => Ok(match (user, present) {
            (_, Some(_)) => CheckOutcome::new(true, "declared with ensure 'present'"),
            (None, None) => CheckOutcome::unsatisfied("not declared"),
            (Some(r), None) => CheckOutcome::unsatisfied(match r.ensure() {
                Some(ensure) => format!("declared with ensure '{ensure}'"),
                None => "declared without ensure".to_string(),
            }),
        }),
        Matcher::HaveUid { uid } => Ok(attribute_equals(present, "uid", uid)),
        Matcher::HaveHomeDirectory { path } => Ok(attribute_equals(present, "home", path)),
        Matcher::HaveLoginShell { shell } => Ok(attribute_equals(present, "shell", shell)),
        Matcher::BelongToGroup { group } => {
            let Some(user) = present else {
                return Ok(CheckOutcome::unsatisfied("user is not declared present"));
            };
            let groups = user_groups(user);
            Ok(CheckOutcome::new(
                groups.iter().any(|g| g == group),
                describe_groups(&groups),
            ))
        }
        Matcher::BelongToGroupMatching { pattern } => {
            let re = compile(pattern)?;
            let Some(user) = present else {
                return Ok(CheckOutcome::unsatisfied("user is not declared present"));
            };
            let groups = user_groups(user);
            Ok(CheckOutcome::new(
                groups.iter().any(|g| re.is_match(g)),
                describe_groups(&groups),
            ))
        }
        _ => Err(unsupported(subject, matcher)),
    }
}

fn evaluate_fact(
    subject: &Subject,
    name: &str,
    matcher: &Matcher,
    ctx: &ExecutionContext<'_>,
) -> Result<CheckOutcome, AssertionError> {
    let fact = ctx.facts().get(name);
    let observed = || match fact {
        Some(value) => format!("fact is {}", render_value(value)),
        None => "fact is not set".to_string(),
    };

    match matcher {
        Matcher::Exist => Ok(CheckOutcome::new(fact.is_some(), observed())),
        Matcher::Equal { value } => Ok(CheckOutcome::new(
            fact.is_some_and(|f| values_equal(f, value)),
            observed(),
        )),
        Matcher::Match { pattern } => {
            let re = compile(pattern)?;
            let matched = fact
                .and_then(scalar_string)
                .is_some_and(|s| re.is_match(&s));
            Ok(CheckOutcome::new(matched, observed()))
        }
        _ => Err(unsupported(subject, matcher)),
    }
}

/// A port listens when the node reports it in the listening-ports fact, or
/// another non-absent resource declares it. The resource a check was
/// generated from never counts.
fn port_listening(number: &str, ctx: &ExecutionContext<'_>) -> CheckOutcome {
    let declared_by = ctx.catalog().resources().iter().find(|r| {
        !r.is_absent()
            && !ctx.is_source(r)
            && r.attribute("port").is_some_and(|p| contains_scalar(p, number))
    });
    if let Some(resource) = declared_by {
        return CheckOutcome::new(true, format!("declared by {}", resource.reference()));
    }

    let reported = match ctx.facts().get(LISTENING_PORTS_FACT) {
        Some(Value::Array(ports)) => ports
            .iter()
            .filter_map(scalar_string)
            .any(|p| p == number),
        Some(Value::String(ports)) => ports
            .split(|c: char| c == ',' || c.is_whitespace())
            .any(|p| p == number),
        _ => false,
    };
    if reported {
        CheckOutcome::new(true, format!("reported by fact '{LISTENING_PORTS_FACT}'"))
    } else {
        CheckOutcome::unsatisfied("no resource or fact declares it")
    }
}

fn existence(found: Option<&Resource>) -> CheckOutcome {
    match found {
        None => CheckOutcome::unsatisfied("not declared"),
        Some(r) if r.is_absent() => CheckOutcome::unsatisfied("declared with ensure 'absent'"),
        Some(r) => match r.ensure() {
            Some(ensure) => CheckOutcome::new(true, format!("declared with ensure '{ensure}'")),
            None => CheckOutcome::new(true, "declared"),
        },
    }
}

fn attribute_equals(resource: Option<&Resource>, attribute: &str, expected: &str) -> CheckOutcome {
    let Some(resource) = resource else {
        return CheckOutcome::unsatisfied("user is not declared present");
    };
    match resource.attribute(attribute) {
        None | Some(Value::Null) => CheckOutcome::unsatisfied(format!("no {attribute} declared")),
        Some(actual) => CheckOutcome::new(
            contains_scalar(actual, expected),
            format!("{attribute} is {}", render_value(actual)),
        ),
    }
}

/// A scalar equal to `expected`, or a list holding one.
fn contains_scalar(value: &Value, expected: &str) -> bool {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_string)
            .any(|item| item == expected),
        other => scalar_string(other).is_some_and(|s| s == expected),
    }
}

/// Primary group followed by secondary groups.
fn user_groups(user: &Resource) -> Vec<String> {
    let mut groups = Vec::new();
    for attribute in ["gid", "groups"] {
        match user.attribute(attribute) {
            Some(Value::Array(items)) => groups.extend(items.iter().filter_map(scalar_string)),
            Some(other) => groups.extend(scalar_string(other)),
            None => {}
        }
    }
    groups
}

fn describe_groups(groups: &[String]) -> String {
    if groups.is_empty() {
        "no groups declared".to_string()
    } else {
        format!("groups are [{}]", groups.join(", "))
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (scalar_string(actual), scalar_string(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn compile(pattern: &str) -> Result<Regex, AssertionError> {
    Regex::new(pattern).map_err(|e| AssertionError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn unsupported(subject: &Subject, matcher: &Matcher) -> AssertionError {
    AssertionError::UnsupportedMatcher {
        subject: subject.to_string(),
        matcher: matcher.name().to_string(),
    }
}
