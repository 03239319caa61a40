//! Commands module - orchestration of the two migration paths

mod iam;
mod kafka;
pub(crate) mod service;

pub use kafka::{load_observed_acls, migrate_kafka_acls};
pub use service::AclMigrationService;
