//! Terraform authoring for Confluent Cloud ACLs

use std::collections::HashMap;

use hcl::expr::{Expression, TemplateExpr, Traversal, Variable};
use hcl::{Block, Body};

use crate::error::{AclMigrationError, AclMigrationResult};
use crate::types::{AclRecord, MigrationConfig};

pub const REST_ENDPOINT_VARIABLE: &str = "confluent_cloud_cluster_rest_endpoint";
pub const API_KEY_VARIABLE: &str = "confluent_cloud_cluster_api_key";
pub const API_SECRET_VARIABLE: &str = "confluent_cloud_cluster_api_secret";

/// File holding the shared input variables
pub const VARIABLES_FILE: &str = "variables.tf";

/// Terraform file name for a clean principal name
pub fn principal_file_name(principal: &str) -> String {
    format!("{principal}-acls.tf")
}

/// Make a clean principal name usable as a Terraform resource name.
///
/// Clean names may still carry IAM characters such as `+`, `=` or `,`, and
/// may start with a digit.
pub fn terraform_name(principal: &str) -> String {
    let mut name: String = principal
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

/// Fail when two clean principal names share a Terraform resource name.
///
/// Each principal file declares resources under its Terraform name, so a
/// shared name would give duplicate resource addresses in one module.
pub fn ensure_unique_names<'a>(
    principals: impl IntoIterator<Item = &'a str>,
) -> AclMigrationResult<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for principal in principals {
        let name = terraform_name(principal);
        if let Some(other) = seen.get(&name) {
            return Err(AclMigrationError::render(
                principal,
                format!("Terraform name '{name}' is already used by principal '{other}'"),
            ));
        }
        seen.insert(name, principal);
    }
    Ok(())
}

/// `var.<name>` reference to an input variable
fn var_ref(variable: &str) -> Expression {
    Traversal::builder(Variable::unchecked("var"))
        .attr(variable)
        .build()
        .into()
}

fn string_variable(name: &str, description: &str, sensitive: bool) -> Block {
    let mut block = Block::builder("variable")
        .add_label(name)
        .add_attribute(("type", Expression::Variable(Variable::unchecked("string"))))
        .add_attribute(("description", description));
    if sensitive {
        block = block.add_attribute(("sensitive", true));
    }
    block.build()
}

/// Render the input variables every principal file refers to
pub fn render_variables(config: &MigrationConfig) -> AclMigrationResult<String> {
    let body = Body::builder()
        .add_block(string_variable(
            &config.cluster_id_variable,
            "ID of the destination Confluent Cloud Kafka cluster",
            false,
        ))
        .add_block(string_variable(
            REST_ENDPOINT_VARIABLE,
            "REST endpoint of the destination Kafka cluster",
            false,
        ))
        .add_block(string_variable(
            API_KEY_VARIABLE,
            "Cluster API key used to manage ACLs",
            true,
        ))
        .add_block(string_variable(
            API_SECRET_VARIABLE,
            "Cluster API secret used to manage ACLs",
            true,
        ))
        .build();

    hcl::to_string(&body).map_err(|e| AclMigrationError::render(VARIABLES_FILE, e))
}

/// Render one principal's service account and ACLs
pub fn render_principal(
    principal: &str,
    records: &[AclRecord],
    config: &MigrationConfig,
) -> AclMigrationResult<String> {
    let name = terraform_name(principal);

    let service_account = Block::builder("resource")
        .add_label("confluent_service_account")
        .add_label(name.as_str())
        .add_attribute(("display_name", principal))
        .add_attribute((
            "description",
            format!("Service account migrated for source principal {principal}"),
        ))
        .build();

    let mut body = Body::builder().add_block(service_account);

    for (index, record) in records.iter().enumerate() {
        let label = format!(
            "{}_{}_{}_{}",
            name,
            record.resource_type.confluent_name().to_lowercase(),
            record.operation.confluent_name().to_lowercase(),
            index + 1
        );
        let principal_ref = TemplateExpr::QuotedString(format!(
            "User:${{confluent_service_account.{name}.id}}"
        ));

        let acl = Block::builder("resource")
            .add_label("confluent_kafka_acl")
            .add_label(label)
            .add_block(
                Block::builder("kafka_cluster")
                    .add_attribute(("id", var_ref(&config.cluster_id_variable)))
                    .build(),
            )
            .add_attribute(("resource_type", record.resource_type.confluent_name()))
            .add_attribute(("resource_name", record.resource_name.as_str()))
            .add_attribute(("pattern_type", record.pattern_type.to_string()))
            .add_attribute(("principal", principal_ref))
            .add_attribute(("host", record.host.as_str()))
            .add_attribute(("operation", record.operation.confluent_name()))
            .add_attribute(("permission", record.permission.to_string()))
            .add_attribute(("rest_endpoint", var_ref(REST_ENDPOINT_VARIABLE)))
            .add_block(
                Block::builder("credentials")
                    .add_attribute(("key", var_ref(API_KEY_VARIABLE)))
                    .add_attribute(("secret", var_ref(API_SECRET_VARIABLE)))
                    .build(),
            )
            .build();
        body = body.add_block(acl);
    }

    hcl::to_string(&body.build()).map_err(|e| AclMigrationError::render(principal, e))
}
