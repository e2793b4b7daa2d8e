//! Shared constants for the catalog policy gate.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default root of the rule-set hierarchy.
pub const DEFAULT_POLICY_BASE_PATH: &str =
    "/etc/puppetlabs/code/environments/production/policy/catalog";

/// Directory segment under the base path that holds per-class rule sets.
pub const CLASS_SEGMENT: &str = "class";

/// Extensions recognized as static rule files.
pub const RULE_FILE_EXTENSIONS: [&str; 3] = ["toml", "yaml", "yml"];

/// Default facts payload format when a request does not name one.
pub const DEFAULT_FACTS_FORMAT: &str = "json";

/// Fact consulted for ports the node reports as already listening.
pub const LISTENING_PORTS_FACT: &str = "listening_ports";

// ---- Decision rendering ----

/// First line of every rejection message.
pub const POLICY_FAILURE_HEADER: &str = "Catalog failed to pass security policies:";

/// Prefix of each failure line in a rejection message.
pub const FAILED_POLICY_PREFIX: &str = "-- Failed policy: ";

// ---- Environment ----

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "CATGATE_LOG";

/// Filter used when `CATGATE_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "catgate_core=info,catgate_policy=info";
