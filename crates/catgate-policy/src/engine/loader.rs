//! Static rule file loading.
//!
//! Rule files live anywhere under a rule-set location and are read in file
//! name order. TOML is the primary format; YAML files with the same shape
//! are accepted too:
//!
//! ```toml
//! [[assertion]]
//! id = "root-uid"
//! description = "root keeps uid 0"
//! subject = { kind = "user", name = "root" }
//! matcher = { kind = "have_uid", uid = "0" }
//! ```

use std::collections::HashSet;
use std::path::Path;

use catgate_core::constants::{CLASS_SEGMENT, RULE_FILE_EXTENSIONS};
use catgate_core::errors::RuleFileError;
use serde::Deserialize;
use walkdir::WalkDir;

use super::report::EvaluationResult;
use crate::assertions::{Assertion, AssertionOrigin, Check, Matcher, Subject};
use crate::resolver::{LocationScope, RuleSetLocation};

/// One `[[assertion]]` entry of a rule file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: Subject,
    pub matcher: Matcher,
    #[serde(default)]
    pub negate: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RuleFile {
    #[serde(default)]
    assertion: Vec<RuleDefinition>,
}

/// Work discovered while collecting assertions: either something to execute
/// or a result that is already known (a file or generator that failed).
#[derive(Debug, Clone)]
pub enum WorkItem {
    Execute(Assertion),
    Record(EvaluationResult),
}

/// Parse the contents of a rule file; the format follows the extension.
pub fn parse_rule_file(path: &Path, content: &str) -> Result<Vec<RuleDefinition>, RuleFileError> {
    let parse_error = |message: String| RuleFileError::Parse {
        path: path.display().to_string(),
        message,
    };

    let file: RuleFile = if content.trim().is_empty() {
        RuleFile::default()
    } else if is_toml(path) {
        toml::from_str(content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
    };

    let mut seen = HashSet::new();
    for definition in &file.assertion {
        if definition.id.trim().is_empty() {
            return Err(RuleFileError::EmptyId {
                path: path.display().to_string(),
            });
        }
        if !seen.insert(definition.id.as_str()) {
            return Err(RuleFileError::DuplicateId {
                path: path.display().to_string(),
                id: definition.id.clone(),
            });
        }
    }

    Ok(file.assertion)
}

/// Load every static assertion under a location.
///
/// The global location skips its `class/` subtree: per-class rules are only
/// loaded through their own class location.
pub fn load_location(location: &RuleSetLocation) -> Vec<WorkItem> {
    let namespace = location.namespace();
    let skip_class_tree = location.scope == LocationScope::Global;
    let mut items = Vec::new();

    let walker = WalkDir::new(&location.path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(skip_class_tree
                && entry.depth() == 1
                && entry.file_type().is_dir()
                && entry.file_name() == CLASS_SEGMENT)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .unwrap_or(location.path.as_path())
                    .display()
                    .to_string();
                tracing::warn!(location = %namespace, path = %path, error = %e, "rule location entry unreadable");
                items.push(WorkItem::Record(EvaluationResult::errored_source(
                    format!("{namespace}:{path}"),
                    "rule location entry".to_string(),
                    namespace.clone(),
                    format!("{namespace}:{path}: {e}"),
                )));
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_rule_file(entry.path()) {
            continue;
        }
        load_file(location, &namespace, entry.path(), &mut items);
    }

    items
}

fn load_file(location: &RuleSetLocation, namespace: &str, path: &Path, items: &mut Vec<WorkItem>) {
    let relative = path
        .strip_prefix(&location.path)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    let file_id = format!("{namespace}/{relative}");

    let loaded = std::fs::read_to_string(path)
        .map_err(|e| RuleFileError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })
        .and_then(|content| parse_rule_file(path, &content));

    match loaded {
        Ok(definitions) => {
            tracing::debug!(file = %file_id, assertions = definitions.len(), "loaded rule file");
            for definition in definitions {
                let check = Check {
                    subject: definition.subject,
                    matcher: definition.matcher,
                    negate: definition.negate,
                };
                items.push(WorkItem::Execute(Assertion {
                    id: format!("{file_id}:{}", definition.id),
                    description: definition.description.unwrap_or_else(|| check.to_string()),
                    origin: AssertionOrigin::Static {
                        location: namespace.to_string(),
                        file: path.to_path_buf(),
                    },
                    check,
                }));
            }
        }
        Err(e) => {
            tracing::warn!(file = %file_id, error = %e, "rule file rejected");
            items.push(WorkItem::Record(EvaluationResult::errored_source(
                file_id.clone(),
                "rule file".to_string(),
                format!("{namespace}: {}", path.display()),
                format!("{file_id}: {e}"),
            )));
        }
    }
}

fn is_rule_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            RULE_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
