//! This crate provides the core business logic for Kafka ACL migration:
//! - IAM action to Kafka ACL mapping
//! - MSK resource ARN to resource name / pattern type extraction
//! - Principal resolution from explicit ARNs or discovered clients
//! - Confluent Cloud ACL emission (Terraform plus an audit report)
//!

mod aws;
pub mod commands;
pub mod emit;
mod error;
pub mod mapping;
mod parsing;
mod resolver;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use aws::principal::{resolve_principal, PrincipalInfo, PrincipalKind};
pub use aws::{AwsError, AwsIamPolicySource, AwsResult, PolicySource, StaticPolicySource};
pub use commands::{load_observed_acls, migrate_kafka_acls, AclMigrationService};
pub use error::{AclMigrationError, AclMigrationResult};
pub use parsing::{clean_name, determine_pattern, extract_pattern, normalize_discovered};
pub use resolver::{load_discovered_clients, principals_from_clients, PrincipalSource};
pub use synthesis::{convert_observed, group_by_principal, translate_statement};
pub use types::{
    AclRecord, AclsByPrincipal, DiscoveredClient, EmissionSummary, MigrationConfig,
    MigrationOutcome, NamedPolicy, ObservedAcl, OneOrMany, Operation, PatternType, Permission,
    PolicyDocument, PolicyStatement, PrincipalPolicies, RawStatement, ResourceType,
    UnknownVariant,
};
