//! ARN parsing (pure Rust): resource patterns and principal names

pub mod principal;
pub mod resource;

pub use principal::{clean_name, normalize_discovered};
pub use resource::{determine_pattern, extract_pattern, names_resource_kind};
