//! Tests for the assertion execution engine.

use std::path::Path;
use std::sync::Arc;

use catgate_core::config::EngineConfig;
use catgate_core::errors::GeneratorError;
use catgate_core::{Catalog, Facts, Resource};
use catgate_policy::engine::{load_location, parse_rule_file, WorkItem};
use catgate_policy::{
    generator_fn, AssertionEngine, Check, EvaluationReport, GeneratorRegistry, ResultStatus,
    RuleSetLocation,
};

/// Write a file under `root`, creating parent directories.
fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn engine() -> AssertionEngine {
    AssertionEngine::new(Arc::new(GeneratorRegistry::with_builtin()))
}

fn ids(report: &EvaluationReport) -> Vec<&str> {
    report
        .results()
        .iter()
        .map(|r| r.assertion_id.as_str())
        .collect()
}

fn statuses(report: &EvaluationReport) -> Vec<ResultStatus> {
    report.results().iter().map(|r| r.status).collect()
}

const TWO_RULES: &str = r#"
[[assertion]]
id = "first"
subject = { kind = "fact", name = "kernel" }
matcher = { kind = "equal", value = "Windows" }

[[assertion]]
id = "second"
subject = { kind = "fact", name = "kernel" }
matcher = { kind = "exist" }
"#;

/// Static assertions come first, then generated ones in declaration order.
#[test]
fn test_execution_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.toml", TWO_RULES);

    let catalog = Catalog::new("web01")
        .with_resource(Resource::new("user", "alice").with_attribute("ensure", "present"))
        .with_resource(Resource::new("apache::vhost", "www").with_attribute("port", 80));
    let facts = Facts::new().with_fact("kernel", "Linux");

    let report = engine().run(&[RuleSetLocation::global(dir.path())], &catalog, &facts);

    assert_eq!(
        ids(&report),
        [
            "global/a.toml:first",
            "global/a.toml:second",
            "user:User[alice]#1",
            "user:User[alice]#2",
            "user:User[alice]#3",
            "listening_port:Apache::Vhost[www]#1",
        ]
    );
}

/// A failing assertion does not stop the ones after it.
#[test]
fn test_no_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.toml", TWO_RULES);

    let facts = Facts::new().with_fact("kernel", "Linux");
    let report = engine().run(
        &[RuleSetLocation::global(dir.path())],
        &Catalog::new("web01"),
        &facts,
    );

    assert_eq!(
        statuses(&report),
        [ResultStatus::Failed, ResultStatus::Passed]
    );
    assert_eq!(
        report.results()[0].detail.as_deref(),
        Some("global/a.toml:first: expected fact 'kernel' to equal 'Windows' (fact is 'Linux')")
    );
}

#[test]
fn test_global_only_with_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.toml", TWO_RULES);

    let facts = Facts::new().with_fact("kernel", "Windows");
    let report = engine().run(
        &[RuleSetLocation::global(dir.path())],
        &Catalog::new("bare"),
        &facts,
    );
    assert_eq!(report.len(), 2);
    assert!(report.is_clean());
}

/// A broken file becomes one errored result; other files still load.
#[test]
fn test_broken_rule_file_isolated() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a_broken.toml", "[[assertion]\nid = ");
    write(dir.path(), "b.toml", TWO_RULES);

    let facts = Facts::new().with_fact("kernel", "Windows");
    let report = engine().run(
        &[RuleSetLocation::global(dir.path())],
        &Catalog::new("web01"),
        &facts,
    );

    assert_eq!(
        ids(&report),
        ["global/a_broken.toml", "global/b.toml:first", "global/b.toml:second"]
    );
    assert_eq!(report.results()[0].status, ResultStatus::Errored);
    assert_eq!(report.count(ResultStatus::Passed), 2);
}

#[test]
fn test_duplicate_rule_id_rejected() {
    let content = r#"
[[assertion]]
id = "same"
subject = { kind = "class", name = "apache" }
matcher = { kind = "exist" }

[[assertion]]
id = "same"
subject = { kind = "class", name = "nginx" }
matcher = { kind = "exist" }
"#;
    let err = parse_rule_file(Path::new("dup.toml"), content).unwrap_err();
    assert!(err.to_string().contains("same"));
}

#[test]
fn test_yaml_rule_file() {
    let content = r#"
assertion:
  - id: ssh
    description: sshd listens
    subject: { kind: port, number: 22 }
    matcher: { kind: be_listening }
"#;
    let rules = parse_rule_file(Path::new("ports.yml"), content).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].description.as_deref(), Some("sshd listens"));
}

#[test]
fn test_empty_rule_file() {
    assert!(parse_rule_file(Path::new("empty.yaml"), "\n").unwrap().is_empty());
}

/// The global location never loads per-class rules; non-rule files are
/// ignored.
#[test]
fn test_global_skips_class_subtree() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "class/apache/listeners.toml", TWO_RULES);
    write(dir.path(), "nested/extra.toml", TWO_RULES);
    write(dir.path(), "README.md", "not a rule file");

    let global = load_location(&RuleSetLocation::global(dir.path()));
    let loaded: Vec<String> = global
        .iter()
        .map(|item| match item {
            WorkItem::Execute(a) => a.id.clone(),
            WorkItem::Record(r) => r.assertion_id.clone(),
        })
        .collect();
    assert_eq!(loaded, ["global/nested/extra.toml:first", "global/nested/extra.toml:second"]);

    let class = load_location(&RuleSetLocation::class(
        "apache",
        dir.path().join("class/apache"),
    ));
    assert_eq!(class.len(), 2);
}

#[test]
fn test_absent_user_single_assertion() {
    let catalog = Catalog::new("web01")
        .with_resource(Resource::new("user", "olduser").with_attribute("ensure", "absent"));
    let report = engine().run(&[], &catalog, &Facts::new());

    assert_eq!(ids(&report), ["user:User[olduser]#1"]);
    assert!(report.is_clean());
}

#[test]
fn test_absent_vhost_no_assertion() {
    let catalog = Catalog::new("web01").with_resource(
        Resource::new("apache::vhost", "old")
            .with_attribute("port", 80)
            .with_attribute("ensure", "absent"),
    );
    assert!(engine().run(&[], &catalog, &Facts::new()).is_empty());
}

#[test]
fn test_uid_zero_fails() {
    let catalog = Catalog::new("web01").with_resource(
        Resource::new("user", "toor")
            .with_attribute("ensure", "present")
            .with_attribute("uid", 0),
    );
    let report = engine().run(&[], &catalog, &Facts::new());

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].detail.as_deref(),
        Some("user:User[toor]#3: expected user 'toor' not to have uid '0' (uid is '0')")
    );
}

/// `uid => [0]` is not a uid the generator can vouch for; the resource is
/// recorded as errored instead of silently passing.
#[test]
fn test_listed_uid_is_not_allowed() {
    let catalog = Catalog::new("web01").with_resource(
        Resource::new("user", "toor")
            .with_attribute("ensure", "present")
            .with_attribute("uid", serde_json::json!([0])),
    );
    let report = engine().run(&[], &catalog, &Facts::new());

    assert_eq!(statuses(&report), [ResultStatus::Errored]);
    assert_eq!(report.results()[0].assertion_id, "user:User[toor]");
    assert!(!report.is_clean());
}

/// A vhost's own port declaration does not make its listening check pass.
#[test]
fn test_generated_listening_check_can_fail() {
    let catalog = Catalog::new("web01")
        .with_resource(Resource::new("apache::vhost", "www").with_attribute("port", 80));

    let report = engine().run(&[], &catalog, &Facts::new());
    assert_eq!(statuses(&report), [ResultStatus::Failed]);
    assert_eq!(
        report.results()[0].detail.as_deref(),
        Some(
            "listening_port:Apache::Vhost[www]#1: expected port '80' to be listening \
             (no resource or fact declares it)"
        )
    );

    let facts = Facts::new().with_fact("listening_ports", serde_json::json!([80]));
    assert!(engine().run(&[], &catalog, &facts).is_clean());
}

/// Generator failures are recorded and the remaining resources still run.
#[test]
fn test_generator_failure_isolated() {
    let mut registry = GeneratorRegistry::with_builtin();
    registry
        .register(
            "service",
            generator_fn("service", |_title, _attributes| {
                Err(GeneratorError::Failed("no port".to_string()))
            }),
        )
        .unwrap();
    let engine = AssertionEngine::new(Arc::new(registry));

    let catalog = Catalog::new("web01")
        .with_resource(Resource::new("service", "sshd"))
        .with_resource(Resource::new("user", "alice").with_attribute("ensure", "present"));
    let report = engine.run(&[], &catalog, &Facts::new());

    assert_eq!(report.len(), 4);
    assert_eq!(report.results()[0].assertion_id, "service:Service[sshd]");
    assert_eq!(report.results()[0].status, ResultStatus::Errored);
    assert_eq!(report.count(ResultStatus::Passed), 3);
}

#[test]
fn test_unsupported_matcher_is_errored() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "bad.toml",
        r#"
[[assertion]]
id = "port-uid"
subject = { kind = "port", number = 22 }
matcher = { kind = "have_uid", uid = "0" }
"#,
    );
    let report = engine().run(
        &[RuleSetLocation::global(dir.path())],
        &Catalog::new("web01"),
        &Facts::new(),
    );
    assert_eq!(statuses(&report), [ResultStatus::Errored]);
    assert!(report.results()[0]
        .detail
        .as_deref()
        .unwrap()
        .starts_with("global/bad.toml:port-uid: "));
}

fn busy_catalog() -> Catalog {
    (0..40).fold(Catalog::new("busy"), |catalog, i| {
        catalog
            .with_resource(
                Resource::new("user", format!("user{i}"))
                    .with_attribute("ensure", "present")
                    .with_attribute("uid", i),
            )
            .with_resource(
                Resource::new("apache::vhost", format!("vhost{i}")).with_attribute("port", 8000 + i),
            )
    })
}

#[test]
fn test_parallel_matches_sequential() {
    let registry = Arc::new(GeneratorRegistry::with_builtin());
    let sequential = AssertionEngine::new(registry.clone());
    let parallel = AssertionEngine::from_config(
        registry,
        &EngineConfig {
            parallel: Some(true),
            threads: Some(4),
        },
    )
    .unwrap();
    assert!(parallel.is_parallel());

    let catalog = busy_catalog();
    let facts = Facts::new();
    assert_eq!(
        sequential.run(&[], &catalog, &facts),
        parallel.run(&[], &catalog, &facts)
    );
}

#[test]
fn test_idempotent_runs() {
    let catalog = busy_catalog();
    let facts = Facts::new();
    let engine = engine();
    assert_eq!(engine.run(&[], &catalog, &facts), engine.run(&[], &catalog, &facts));
}

/// A failing evaluation leaves nothing behind for the next one.
#[test]
fn test_isolation_between_runs() {
    let engine = engine();
    let failing = Catalog::new("a").with_resource(
        Resource::new("user", "toor")
            .with_attribute("ensure", "present")
            .with_attribute("uid", 0),
    );
    let clean = Catalog::new("b")
        .with_resource(Resource::new("user", "alice").with_attribute("ensure", "present"));

    assert!(!engine.run(&[], &failing, &Facts::new()).is_clean());
    let report = engine.run(&[], &clean, &Facts::new());
    assert_eq!(report.len(), 3);
    assert!(report.is_clean());
}

#[test]
fn test_report_json() {
    let catalog = Catalog::new("web01").with_resource(Resource::new("user", "alice").with_attribute("ensure", "present"));
    let json = engine().run(&[], &catalog, &Facts::new()).to_json().unwrap();
    assert!(json.contains("\"status\": \"passed\""));
}

#[test]
fn test_checks_serialize_with_kind_tags() {
    let check = Check::should(
        catgate_policy::Subject::port("443"),
        catgate_policy::Matcher::BeListening,
    );
    let value = serde_json::to_value(&check).unwrap();
    assert_eq!(value["subject"]["kind"], "port");
    assert_eq!(value["matcher"]["kind"], "be_listening");
}
