//! Maps a catalog's declared classes to rule-set locations on disk.
//!
//! Layout under the base path:
//!
//! ```text
//! <base>/                      global rules
//! <base>/class/<token>/        rules for one class
//! ```
//!
//! The token is the class name with every `:` replaced by `_`, so
//! `apache::mod::ssl` lives in `class/apache__mod__ssl`. Tokens match
//! directory names exactly, case included, on every filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use catgate_core::config::PolicyConfig;
use catgate_core::constants::CLASS_SEGMENT;
use catgate_core::errors::ResolveError;
use catgate_core::types::Catalog;
use rustc_hash::FxHashSet;

/// Which part of the hierarchy a location belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationScope {
    Global,
    Class(String),
}

/// A directory of rule files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSetLocation {
    pub scope: LocationScope,
    pub path: PathBuf,
}

impl RuleSetLocation {
    pub fn global(path: impl Into<PathBuf>) -> Self {
        Self {
            scope: LocationScope::Global,
            path: path.into(),
        }
    }

    pub fn class(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            scope: LocationScope::Class(name.into()),
            path: path.into(),
        }
    }

    /// `global` or `class/<token>`; prefixes static assertion ids.
    pub fn namespace(&self) -> String {
        match &self.scope {
            LocationScope::Global => "global".to_string(),
            LocationScope::Class(name) => format!("{CLASS_SEGMENT}/{}", class_token(name)),
        }
    }
}

impl fmt::Display for RuleSetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.namespace(), self.path.display())
    }
}

/// Directory token for a class name.
pub fn class_token(name: &str) -> String {
    name.replace(':', "_")
}

/// Resolves rule-set locations beneath a base path. Stateless apart from
/// the base path; every call reads the filesystem afresh.
#[derive(Debug, Clone)]
pub struct PolicyResolver {
    base: PathBuf,
}

impl PolicyResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.effective_base_path())
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn global_location(&self) -> RuleSetLocation {
        RuleSetLocation::global(&self.base)
    }

    /// Candidate location for a class, whether or not it exists.
    pub fn class_location(&self, class: &str) -> RuleSetLocation {
        RuleSetLocation::class(
            class,
            self.base.join(CLASS_SEGMENT).join(class_token(class)),
        )
    }

    /// The global location followed by one location per declared class
    /// that has a rule directory, in class declaration order.
    ///
    /// # Errors
    /// `ResolveError` when the base path is missing, not a directory, or
    /// cannot be listed.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Vec<RuleSetLocation>, ResolveError> {
        self.check_global()?;

        let global = self.global_location();
        let mut seen: FxHashSet<PathBuf> = FxHashSet::default();
        seen.insert(global.path.clone());
        let mut locations = vec![global];

        let directories = self.class_directories();
        for class in catalog.classes() {
            let location = self.class_location(class);
            if !directories.contains(class_token(class).as_str()) {
                tracing::debug!(class = %class, path = %location.path.display(), "no rules for class");
                continue;
            }
            if seen.insert(location.path.clone()) {
                locations.push(location);
            }
        }

        tracing::debug!(node = %catalog.name, locations = locations.len(), "resolved rule-set locations");
        Ok(locations)
    }

    /// Names of the directories under `<base>/class`.
    fn class_directories(&self) -> FxHashSet<String> {
        let root = self.base.join(CLASS_SEGMENT);
        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %root.display(), error = %e, "no class rule directories");
                return FxHashSet::default();
            }
        };
        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }

    fn check_global(&self) -> Result<(), ResolveError> {
        let path = self.base.display().to_string();
        let metadata =
            std::fs::metadata(&self.base).map_err(|e| ResolveError::GlobalLocationInaccessible {
                path: path.clone(),
                message: e.to_string(),
            })?;
        if !metadata.is_dir() {
            return Err(ResolveError::GlobalLocationNotDirectory { path });
        }
        std::fs::read_dir(&self.base).map_err(|e| ResolveError::GlobalLocationInaccessible {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }
}
