//! Configuration system for the catalog policy gate.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod catgate_config;
pub mod engine_config;
pub mod facts_config;
pub mod policy_config;

pub use catgate_config::{CatgateConfig, CliOverrides};
pub use engine_config::EngineConfig;
pub use facts_config::FactsConfig;
pub use policy_config::PolicyConfig;
