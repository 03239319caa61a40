//! Asset emission: Terraform files per principal plus one audit report

pub mod report;
pub mod terraform;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::error::{AclMigrationError, AclMigrationResult};
use crate::types::{AclsByPrincipal, EmissionSummary, MigrationConfig};

fn write_terraform(path: &Path, content: &str) -> AclMigrationResult<()> {
    std::fs::write(path, content).map_err(|source| AclMigrationError::TerraformWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every principal's Terraform file and the audit report.
///
/// Principals whose Terraform names collide are rejected before anything is
/// written. Otherwise stops at the first failed write; files already written
/// stay on disk.
pub fn emit_assets(
    acls: &AclsByPrincipal,
    config: &MigrationConfig,
    generated_at: DateTime<Utc>,
) -> AclMigrationResult<EmissionSummary> {
    terraform::ensure_unique_names(acls.keys().map(String::as_str))?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| {
        AclMigrationError::TerraformWrite {
            path: config.output_dir.clone(),
            source,
        }
    })?;

    let mut terraform_files: Vec<PathBuf> = Vec::new();

    let variables_path = config.output_dir.join(terraform::VARIABLES_FILE);
    write_terraform(&variables_path, &terraform::render_variables(config)?)?;
    terraform_files.push(variables_path);

    for (principal, records) in acls {
        let path = config
            .output_dir
            .join(terraform::principal_file_name(principal));
        let content = terraform::render_principal(principal, records, config)?;
        write_terraform(&path, &content)?;
        info!(
            "Wrote {} ACLs for {} to {}",
            records.len(),
            principal,
            path.display()
        );
        terraform_files.push(path);
    }

    let report_path = config.output_dir.join(&config.report_file_name);
    std::fs::write(&report_path, report::render_report(acls, generated_at)).map_err(
        |source| AclMigrationError::ReportWrite {
            path: report_path.clone(),
            source,
        },
    )?;
    info!("Wrote audit report to {}", report_path.display());

    Ok(EmissionSummary {
        principal_count: acls.len(),
        acl_count: acls.values().map(Vec::len).sum(),
        terraform_files,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AclRecord, Operation, PatternType, Permission, ResourceType};

    fn acls() -> AclsByPrincipal {
        acls_for(&["alpha", "beta"])
    }

    fn acls_for(principals: &[&str]) -> AclsByPrincipal {
        let mut acls = AclsByPrincipal::new();
        for principal in principals {
            acls.insert(
                principal.to_string(),
                vec![AclRecord {
                    resource_type: ResourceType::Topic,
                    resource_name: "orders".to_string(),
                    pattern_type: PatternType::Literal,
                    principal: principal.to_string(),
                    host: "*".to_string(),
                    operation: Operation::Describe,
                    permission: Permission::Allow,
                }],
            );
        }
        acls
    }

    #[test]
    fn test_emit_writes_one_file_per_principal_and_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = MigrationConfig::new(dir.path().join("out"));

        let summary = emit_assets(&acls(), &config, Utc::now()).expect("emit should succeed");

        assert_eq!(summary.principal_count, 2);
        assert_eq!(summary.acl_count, 2);
        assert_eq!(summary.terraform_files.len(), 3);
        assert!(config.output_dir.join("variables.tf").is_file());
        assert!(config.output_dir.join("alpha-acls.tf").is_file());
        assert!(config.output_dir.join("beta-acls.tf").is_file());

        let report = std::fs::read_to_string(&summary.report_path).expect("report exists");
        assert!(report.contains("## Principal: alpha"));
        assert!(report.contains("## Principal: beta"));
    }

    #[test]
    fn test_emit_fails_when_output_dir_is_a_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let config = MigrationConfig::new(file.path());

        let result = emit_assets(&acls(), &config, Utc::now());
        assert!(matches!(result, Err(AclMigrationError::TerraformWrite { .. })));
    }

    #[test]
    fn test_failed_write_keeps_earlier_files_and_skips_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = MigrationConfig::new(dir.path().join("out"));
        std::fs::create_dir_all(config.output_dir.join("beta-acls.tf")).expect("blocking dir");

        let result = emit_assets(&acls(), &config, Utc::now());

        let Err(AclMigrationError::TerraformWrite { path, .. }) = result else {
            panic!("expected a Terraform write error");
        };
        assert!(path.ends_with("beta-acls.tf"));
        assert!(config.output_dir.join("variables.tf").is_file());
        assert!(config.output_dir.join("alpha-acls.tf").is_file());
        assert!(!config.output_dir.join(&config.report_file_name).exists());
    }

    #[test]
    fn test_colliding_terraform_names_write_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = MigrationConfig::new(dir.path().join("out"));

        let result = emit_assets(&acls_for(&["svc+ops", "svc=ops"]), &config, Utc::now());

        assert!(matches!(result, Err(AclMigrationError::Render { .. })));
        assert!(!config.output_dir.exists());
    }
}
