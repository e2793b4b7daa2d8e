//! Data model read by the policy pipeline: catalogs, resources, and facts.
//! All of it is owned by the caller and only ever borrowed immutably.

pub mod catalog;
pub mod facts;
pub mod resource;

pub use catalog::Catalog;
pub use facts::{Facts, FactsFormat};
pub use resource::{normalize_type_name, scalar_string, Attributes, Resource, ResourceRef};
