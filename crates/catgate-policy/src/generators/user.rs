//! Account hygiene checks for `User` resources.

use catgate_core::errors::GeneratorError;
use catgate_core::types::{scalar_string, Attributes};
use serde_json::Value;

use super::types::AssertionGenerator;
use super::{attribute, ensure};
use crate::assertions::{Check, Matcher, Subject};

/// A user declared with `ensure => present` must exist as declared, and must
/// never hold uid 0 or a group whose id starts with 0. Any other `ensure`
/// (absent, unset, `role`) only asserts that the user does not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserGenerator;

impl AssertionGenerator for UserGenerator {
    fn name(&self) -> &str {
        "user"
    }

    fn generate(&self, title: &str, attributes: &Attributes) -> Result<Vec<Check>, GeneratorError> {
        let name = attribute(attributes, "name")?.unwrap_or_else(|| title.to_string());
        let user = || Subject::user(name.as_str());

        if ensure(attributes)?.as_deref() != Some("present") {
            return Ok(vec![Check::should_not(user(), Matcher::Exist)]);
        }

        let mut checks = vec![Check::should(user(), Matcher::Exist)];
        if let Some(uid) = attribute(attributes, "uid")? {
            checks.push(Check::should(user(), Matcher::HaveUid { uid }));
        }
        checks.push(Check::should_not(
            user(),
            Matcher::HaveUid {
                uid: "0".to_string(),
            },
        ));
        if let Some(group) = attribute(attributes, "gid")? {
            checks.push(Check::should(user(), Matcher::BelongToGroup { group }));
        }
        checks.push(Check::should_not(
            user(),
            Matcher::BelongToGroupMatching {
                pattern: "^0".to_string(),
            },
        ));
        for group in secondary_groups(attributes)? {
            checks.push(Check::should(user(), Matcher::BelongToGroup { group }));
        }
        if let Some(path) = attribute(attributes, "home")? {
            checks.push(Check::should(user(), Matcher::HaveHomeDirectory { path }));
        }
        if let Some(shell) = attribute(attributes, "shell")? {
            checks.push(Check::should(user(), Matcher::HaveLoginShell { shell }));
        }

        Ok(checks)
    }
}

/// `groups` may be a list of names or a single name.
fn secondary_groups(attributes: &Attributes) -> Result<Vec<String>, GeneratorError> {
    match attributes.get("groups") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                scalar_string(item).ok_or_else(|| GeneratorError::InvalidAttribute {
                    attribute: "groups".to_string(),
                    message: format!("group entries must be names, found {item}"),
                })
            })
            .collect(),
        Some(other) => scalar_string(other)
            .map(|group| vec![group])
            .ok_or_else(|| GeneratorError::InvalidAttribute {
                attribute: "groups".to_string(),
                message: "expected a group name or a list of group names".to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn name_attribute_overrides_title() {
        let checks = UserGenerator
            .generate("svc", &attrs(json!({"name": "service", "ensure": "present"})))
            .unwrap();
        assert!(checks.iter().all(|c| c.subject == Subject::user("service")));
    }

    #[test]
    fn nested_groups_are_rejected() {
        let err = UserGenerator
            .generate("alice", &attrs(json!({"ensure": "present", "groups": [["wheel"]]})))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidAttribute { ref attribute, .. } if attribute == "groups"));
    }

    #[test]
    fn listed_uid_is_rejected() {
        let err = UserGenerator
            .generate("toor", &attrs(json!({"ensure": "present", "uid": [0]})))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidAttribute { ref attribute, .. } if attribute == "uid"));
    }
}
