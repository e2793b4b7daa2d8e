//! Tests for the generator registry and built-in generators.

use catgate_core::errors::{GeneratorError, RegistryError};
use catgate_core::{Attributes, Resource};
use catgate_policy::{
    generator_fn, AssertionGenerator, AssertionOrigin, Check, GeneratorRegistry,
    ListeningPortGenerator, Matcher, Subject, UserGenerator,
};
use serde_json::json;

fn attrs(value: serde_json::Value) -> Attributes {
    serde_json::from_value(value).unwrap()
}

fn expectations(checks: &[Check]) -> Vec<String> {
    checks.iter().map(Check::to_string).collect()
}

#[test]
fn test_user_full_declaration() {
    let checks = UserGenerator
        .generate(
            "deploy",
            &attrs(json!({
                "ensure": "present",
                "uid": 1001,
                "gid": "100",
                "groups": ["www-data", "adm"],
                "home": "/home/deploy",
                "shell": "/bin/bash"
            })),
        )
        .unwrap();

    assert_eq!(
        expectations(&checks),
        [
            "user 'deploy' should exist",
            "user 'deploy' should have uid '1001'",
            "user 'deploy' should not have uid '0'",
            "user 'deploy' should belong to group '100'",
            "user 'deploy' should not belong to a group matching '^0'",
            "user 'deploy' should belong to group 'www-data'",
            "user 'deploy' should belong to group 'adm'",
            "user 'deploy' should have home directory '/home/deploy'",
            "user 'deploy' should have login shell '/bin/bash'",
        ]
    );
}

/// The uid-0 and group-0 checks are emitted even when nothing else is declared.
#[test]
fn test_user_minimal_declaration() {
    let checks = UserGenerator
        .generate("alice", &attrs(json!({"ensure": "present"})))
        .unwrap();
    assert_eq!(
        expectations(&checks),
        [
            "user 'alice' should exist",
            "user 'alice' should not have uid '0'",
            "user 'alice' should not belong to a group matching '^0'",
        ]
    );
}

#[test]
fn test_absent_user_yields_single_check() {
    let checks = UserGenerator
        .generate("olduser", &attrs(json!({"ensure": "absent", "uid": 0})))
        .unwrap();
    assert_eq!(checks, vec![Check::should_not(Subject::user("olduser"), Matcher::Exist)]);
}

/// Only `ensure => present` manages the account; anything else, including
/// no ensure at all, asserts absence.
#[test]
fn test_user_not_ensured_present() {
    let unset = UserGenerator.generate("alice", &Attributes::new()).unwrap();
    assert_eq!(unset, vec![Check::should_not(Subject::user("alice"), Matcher::Exist)]);

    let role = UserGenerator
        .generate("ops", &attrs(json!({"ensure": "role", "uid": 0})))
        .unwrap();
    assert_eq!(role, vec![Check::should_not(Subject::user("ops"), Matcher::Exist)]);
}

#[test]
fn test_single_scalar_group() {
    let checks = UserGenerator
        .generate("bob", &attrs(json!({"ensure": "present", "groups": "wheel"})))
        .unwrap();
    assert!(checks.contains(&Check::should(
        Subject::user("bob"),
        Matcher::BelongToGroup {
            group: "wheel".to_string()
        }
    )));
}

#[test]
fn test_invalid_groups_shape() {
    let err = UserGenerator
        .generate("bob", &attrs(json!({"ensure": "present", "groups": {"primary": "wheel"}})))
        .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidAttribute { .. }));
}

/// A list where a single value belongs is rejected rather than skipped, so
/// `uid => [0]` cannot slip past the uid-0 check.
#[test]
fn test_structured_scalar_attributes_rejected() {
    for (attribute, value) in [
        ("uid", json!([0])),
        ("gid", json!(["0"])),
        ("home", json!({"path": "/root"})),
        ("shell", json!(["/bin/sh"])),
        ("ensure", json!(["present"])),
    ] {
        let mut declared = attrs(json!({"ensure": "present"}));
        declared.insert(attribute.to_string(), value);
        let err = UserGenerator.generate("toor", &declared).unwrap_err();
        assert!(
            matches!(err, GeneratorError::InvalidAttribute { attribute: ref a, .. } if a == attribute),
            "{attribute}: {err:?}"
        );
    }
}

#[test]
fn test_vhost_port_listening() {
    let checks = ListeningPortGenerator
        .generate("www", &attrs(json!({"port": 8443})))
        .unwrap();
    assert_eq!(
        checks,
        vec![Check::should(Subject::port("8443"), Matcher::BeListening)]
    );
}

#[test]
fn test_vhost_port_list() {
    let checks = ListeningPortGenerator
        .generate("www", &attrs(json!({"port": [80, "443"]})))
        .unwrap();
    assert_eq!(
        checks,
        vec![
            Check::should(Subject::port("80"), Matcher::BeListening),
            Check::should(Subject::port("443"), Matcher::BeListening),
        ]
    );

    for port in [json!([[80]]), json!({"http": 80})] {
        let err = ListeningPortGenerator
            .generate("www", &attrs(json!({ "port": port })))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidAttribute { ref attribute, .. } if attribute == "port"));
    }
}

#[test]
fn test_vhost_without_port_or_absent() {
    assert!(ListeningPortGenerator
        .generate("www", &attrs(json!({"docroot": "/var/www"})))
        .unwrap()
        .is_empty());
    assert!(ListeningPortGenerator
        .generate("www", &attrs(json!({"port": 80, "ensure": "absent"})))
        .unwrap()
        .is_empty());
}

#[test]
fn test_builtin_bindings() {
    let registry = GeneratorRegistry::with_builtin();
    assert_eq!(registry.resource_types(), ["Apache::Vhost", "User"]);
    assert!(registry.contains("apache::vhost"));
    assert_eq!(registry.binding("user").map(|g| g.name()), Some("user"));
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = GeneratorRegistry::with_builtin();
    let err = registry.register("user", UserGenerator).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateBinding { ref resource_type } if resource_type == "User"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_empty_resource_type_rejected() {
    let mut registry = GeneratorRegistry::new();
    assert!(matches!(
        registry.register("  ", UserGenerator),
        Err(RegistryError::EmptyResourceType)
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_generate_assigns_ids_and_origin() {
    let registry = GeneratorRegistry::with_builtin();
    let resource = Resource::new("apache::vhost", "www").with_attribute("port", 443);

    let assertions = registry.generate(&resource).unwrap();
    assert_eq!(assertions.len(), 1);
    assert_eq!(assertions[0].id, "listening_port:Apache::Vhost[www]#1");
    assert_eq!(assertions[0].description, "port '443' should be listening");
    assert!(matches!(
        assertions[0].origin,
        AssertionOrigin::Generated { ref generator, .. } if generator == "listening_port"
    ));
}

#[test]
fn test_unbound_type_yields_nothing() {
    let registry = GeneratorRegistry::with_builtin();
    let resource = Resource::new("file", "/etc/motd");
    assert!(registry.generate(&resource).unwrap().is_empty());
}

#[test]
fn test_closure_generator() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "service",
            generator_fn("service_port", |_title, attributes| {
                Ok(attributes
                    .get("port")
                    .and_then(|p| p.as_u64())
                    .map(|p| vec![Check::should(Subject::port(p.to_string()), Matcher::BeListening)])
                    .unwrap_or_default())
            }),
        )
        .unwrap();

    let resource = Resource::new("service", "sshd").with_attribute("port", 22);
    let assertions = registry.generate(&resource).unwrap();
    assert_eq!(assertions[0].id, "service_port:Service[sshd]#1");
}

#[test]
fn test_generator_error_becomes_failure() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "service",
            generator_fn("broken", |_title, _attributes| {
                Err(GeneratorError::Failed("cannot read attributes".to_string()))
            }),
        )
        .unwrap();

    let failure = registry
        .generate(&Resource::new("service", "sshd"))
        .unwrap_err();
    assert_eq!(failure.generator, "broken");
    assert_eq!(failure.resource.to_string(), "Service[sshd]");
    assert_eq!(failure.assertion_id(), "broken:Service[sshd]");
}

#[test]
fn test_generator_panic_becomes_failure() {
    let mut registry = GeneratorRegistry::new();
    registry
        .register(
            "service",
            generator_fn("panicky", |title, _attributes| -> Result<Vec<Check>, GeneratorError> {
                panic!("unexpected title {title}")
            }),
        )
        .unwrap();

    let failure = registry
        .generate(&Resource::new("service", "sshd"))
        .unwrap_err();
    assert_eq!(
        failure.error,
        GeneratorError::Panicked("unexpected title sshd".to_string())
    );
}

/// A user without a usable name produces malformed checks.
#[test]
fn test_malformed_output_rejected() {
    let registry = GeneratorRegistry::with_builtin();
    let resource = Resource::new("user", "");
    let failure = registry.generate(&resource).unwrap_err();
    assert!(matches!(failure.error, GeneratorError::Malformed(_)));
}
