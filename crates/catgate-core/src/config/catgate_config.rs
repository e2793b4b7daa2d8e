//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EngineConfig, FactsConfig, PolicyConfig};
use crate::errors::ConfigError;
use crate::types::FactsFormat;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "catgate.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CATGATE_*`)
/// 3. Project config (`catgate.toml` in the project root)
/// 4. User config (`~/.catgate/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatgateConfig {
    pub policy: PolicyConfig,
    pub engine: EngineConfig,
    pub facts: FactsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub policy_base_path: Option<PathBuf>,
    pub engine_parallel: Option<bool>,
    pub engine_threads: Option<usize>,
}

impl CatgateConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CatgateConfig) -> Result<(), ConfigError> {
        if let Some(ref base) = config.policy.base_path {
            if base.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "policy.base_path".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if config.engine.threads == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "engine.threads".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref format) = config.facts.default_format {
            format
                .parse::<FactsFormat>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "facts.default_format".to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// The facts format to assume when a request names none.
    pub fn default_facts_format(&self) -> Result<FactsFormat, ConfigError> {
        self.facts
            .effective_default_format()
            .parse()
            .map_err(|e: crate::errors::FactsError| ConfigError::InvalidValue {
                field: "facts.default_format".to_string(),
                message: e.to_string(),
            })
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".catgate").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CatgateConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CatgateConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut CatgateConfig, other: &CatgateConfig) {
        if other.policy.base_path.is_some() {
            base.policy.base_path = other.policy.base_path.clone();
        }
        if other.engine.parallel.is_some() {
            base.engine.parallel = other.engine.parallel;
        }
        if other.engine.threads.is_some() {
            base.engine.threads = other.engine.threads;
        }
        if other.facts.default_format.is_some() {
            base.facts.default_format = other.facts.default_format.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CATGATE_POLICY_BASE_PATH`, `CATGATE_ENGINE_THREADS`, etc.
    fn apply_env_overrides(config: &mut CatgateConfig) {
        if let Some(val) = std::env::var_os("CATGATE_POLICY_BASE_PATH") {
            if !val.is_empty() {
                config.policy.base_path = Some(PathBuf::from(val));
            }
        }
        if let Ok(val) = std::env::var("CATGATE_ENGINE_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.engine.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CATGATE_ENGINE_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.engine.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CATGATE_FACTS_DEFAULT_FORMAT") {
            config.facts.default_format = Some(val);
        }
    }

    fn apply_cli_overrides(config: &mut CatgateConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.policy_base_path {
            config.policy.base_path = Some(v.clone());
        }
        if let Some(v) = cli.engine_parallel {
            config.engine.parallel = Some(v);
        }
        if let Some(v) = cli.engine_threads {
            config.engine.threads = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
