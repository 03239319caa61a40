//! Translation of IAM policy statements into Kafka ACL records

use log::debug;

use crate::mapping::{self, ActionMapping, ACTION_PREFIX, WILDCARD_ACTION};
use crate::parsing::{clean_name, extract_pattern, names_resource_kind};
use crate::types::{AclRecord, PatternType, Permission, PolicyStatement};

/// IAM gives no source host, so every translated ACL applies to all hosts
pub const ANY_HOST: &str = "*";

/// Translate one policy statement for a raw principal identifier.
///
/// `kafka-cluster:*` expands to every entry of the action table. Actions
/// outside the table are skipped. A pattern-requiring action yields one
/// record per resource that names its resource kind.
pub fn translate_statement(principal: &str, statement: &PolicyStatement) -> Vec<AclRecord> {
    let principal = clean_name(principal);
    let permission = Permission::from_effect(&statement.effect);
    let mut records = Vec::new();

    for action in &statement.actions {
        let action = action.trim();
        if action == WILDCARD_ACTION {
            for (_, mapping) in mapping::all_mappings() {
                records.extend(records_for(
                    mapping,
                    &statement.resources,
                    &principal,
                    &permission,
                ));
            }
        } else if !action.starts_with(ACTION_PREFIX) {
            debug!("Skipping non kafka-cluster action '{action}'");
        } else if let Some(mapping) = mapping::lookup(action) {
            records.extend(records_for(
                mapping,
                &statement.resources,
                &principal,
                &permission,
            ));
        } else {
            debug!("Skipping unmapped action '{action}'");
        }
    }

    records
}

fn records_for(
    mapping: ActionMapping,
    resources: &[String],
    principal: &str,
    permission: &Permission,
) -> Vec<AclRecord> {
    resource_patterns(mapping, resources)
        .into_iter()
        .map(|(resource_name, pattern_type)| AclRecord {
            resource_type: mapping.resource_type,
            resource_name,
            pattern_type,
            principal: principal.to_string(),
            host: ANY_HOST.to_string(),
            operation: mapping.operation,
            permission: permission.clone(),
        })
        .collect()
}

/// Distinct (name, pattern) pairs an action's ACLs apply to, in resource order
fn resource_patterns(mapping: ActionMapping, resources: &[String]) -> Vec<(String, PatternType)> {
    let wildcard = ("*".to_string(), PatternType::Literal);
    if !mapping.requires_pattern || resources.is_empty() {
        return vec![wildcard];
    }

    let mut patterns: Vec<(String, PatternType)> = Vec::new();
    for resource in resources
        .iter()
        .filter(|r| names_resource_kind(r, mapping.resource_type))
    {
        let pattern = extract_pattern(resource, mapping.resource_type);
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }

    if patterns.is_empty() {
        debug!(
            "No resource names a {}; using wildcard",
            mapping.resource_type
        );
        patterns.push(wildcard);
    }
    patterns
}
