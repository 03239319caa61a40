//! Direct migration of ACLs observed on the source Kafka cluster

use std::path::Path;

use chrono::Utc;
use log::info;

use crate::emit::emit_assets;
use crate::error::{AclMigrationError, AclMigrationResult};
use crate::synthesis::{convert_observed, group_by_principal};
use crate::types::{MigrationConfig, MigrationOutcome, ObservedAcl};

/// Load an ACL listing: a JSON array of [`ObservedAcl`]
pub fn load_observed_acls(path: &Path) -> AclMigrationResult<Vec<ObservedAcl>> {
    let content = std::fs::read_to_string(path).map_err(|source| AclMigrationError::InputRead {
        what: "Kafka ACL listing",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AclMigrationError::InputShape {
        what: "Kafka ACL listing",
        path: path.to_path_buf(),
        source,
    })
}

/// Convert observed ACLs one to one and emit them grouped by clean principal
pub fn migrate_kafka_acls(
    observed: &[ObservedAcl],
    config: &MigrationConfig,
) -> AclMigrationResult<MigrationOutcome> {
    if observed.is_empty() {
        info!("No ACLs found on the source cluster; no files written");
        return Ok(MigrationOutcome::NoPermissions);
    }

    let acls = group_by_principal(observed.iter().map(convert_observed));
    info!(
        "Converted {} ACLs for {} principals",
        observed.len(),
        acls.len()
    );
    emit_assets(&acls, config, Utc::now()).map(MigrationOutcome::Emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_migrate_kafka_acls_groups_and_emits() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[
                {{"resource_type": "TOPIC", "resource_name": "orders", "pattern_type": "LITERAL",
                  "principal": "User:alice", "host": "*", "operation": "READ", "permission_type": "ALLOW"}},
                {{"resource_type": "GROUP", "resource_name": "app-", "pattern_type": "PREFIXED",
                  "principal": "User:alice", "host": "10.0.0.5", "operation": "READ", "permission_type": "ALLOW"}},
                {{"resource_type": "CLUSTER", "resource_name": "kafka-cluster", "pattern_type": "LITERAL",
                  "principal": "User:bob", "host": "*", "operation": "IDEMPOTENT_WRITE", "permission_type": "ALLOW"}}
            ]"#
        )
        .expect("write listing");

        let observed = load_observed_acls(file.path()).expect("listing should load");
        let dir = tempfile::tempdir().expect("temp dir");
        let config = MigrationConfig::new(dir.path());

        let outcome = migrate_kafka_acls(&observed, &config).expect("migration should succeed");
        let MigrationOutcome::Emitted(summary) = outcome else {
            panic!("expected emitted outcome");
        };
        assert_eq!(summary.principal_count, 2);
        assert_eq!(summary.acl_count, 3);

        let alice = std::fs::read_to_string(dir.path().join("alice-acls.tf")).expect("alice file");
        assert!(alice.contains(r#""10.0.0.5""#));
        assert!(alice.contains(r#""PREFIXED""#));
    }

    #[test]
    fn test_unknown_operation_is_input_shape_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"resource_type": "TOPIC", "resource_name": "orders", "pattern_type": "LITERAL",
                 "principal": "User:alice", "host": "*", "operation": "FLY", "permission_type": "ALLOW"}}]"#
        )
        .expect("write listing");

        let result = load_observed_acls(file.path());
        assert!(matches!(result, Err(AclMigrationError::InputShape { .. })));
    }

    #[test]
    fn test_empty_listing_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("out");
        let outcome =
            migrate_kafka_acls(&[], &MigrationConfig::new(&out)).expect("run should succeed");
        assert_eq!(outcome, MigrationOutcome::NoPermissions);
        assert!(!out.exists());
    }
}
