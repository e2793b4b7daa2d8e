//! Core types, errors, config, events, tracing, and constants shared by the
//! catalog policy gate.
//!
//! The policy pipeline itself lives in `catgate-policy`; this crate only owns
//! the data model it reads (catalogs, resources, facts) and the ambient
//! concerns every stage needs.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

pub use types::{Attributes, Catalog, Facts, FactsFormat, Resource, ResourceRef};
