//! Static mapping from MSK IAM actions to Kafka ACL operations
//!
//! The table is data, not branching: extending the tool to a new IAM action
//! means adding one row to [`ACTION_MAPPINGS`].

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::types::{Operation, ResourceType};

/// Prefix shared by every MSK IAM data-plane action
pub const ACTION_PREFIX: &str = "kafka-cluster:";

/// Action that grants or denies everything in the table
pub const WILDCARD_ACTION: &str = "kafka-cluster:*";

/// Kafka-level meaning of one IAM action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionMapping {
    pub operation: Operation,
    pub resource_type: ResourceType,
    /// Whether the ACL resource name comes from the statement's resource ARN
    pub requires_pattern: bool,
}

const fn mapping(
    operation: Operation,
    resource_type: ResourceType,
    requires_pattern: bool,
) -> ActionMapping {
    ActionMapping {
        operation,
        resource_type,
        requires_pattern,
    }
}

/// IAM action to Kafka ACL table, in declaration order
pub const ACTION_MAPPINGS: &[(&str, ActionMapping)] = &[
    (
        "kafka-cluster:AlterCluster",
        mapping(Operation::Alter, ResourceType::Cluster, false),
    ),
    (
        "kafka-cluster:AlterClusterDynamicConfiguration",
        mapping(Operation::AlterConfigs, ResourceType::Cluster, false),
    ),
    (
        "kafka-cluster:AlterGroup",
        mapping(Operation::Read, ResourceType::Group, true),
    ),
    (
        "kafka-cluster:AlterTopic",
        mapping(Operation::Alter, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:AlterTopicDynamicConfiguration",
        mapping(Operation::AlterConfigs, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:AlterTransactionalId",
        mapping(Operation::Write, ResourceType::TransactionalId, true),
    ),
    (
        "kafka-cluster:CreateTopic",
        mapping(Operation::Create, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:DeleteGroup",
        mapping(Operation::Delete, ResourceType::Group, true),
    ),
    (
        "kafka-cluster:DeleteTopic",
        mapping(Operation::Delete, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:DescribeCluster",
        mapping(Operation::Describe, ResourceType::Cluster, false),
    ),
    (
        "kafka-cluster:DescribeClusterDynamicConfiguration",
        mapping(Operation::DescribeConfigs, ResourceType::Cluster, false),
    ),
    (
        "kafka-cluster:DescribeGroup",
        mapping(Operation::Describe, ResourceType::Group, true),
    ),
    (
        "kafka-cluster:DescribeTopic",
        mapping(Operation::Describe, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:DescribeTopicDynamicConfiguration",
        mapping(Operation::DescribeConfigs, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:DescribeTransactionalId",
        mapping(Operation::Describe, ResourceType::TransactionalId, true),
    ),
    (
        "kafka-cluster:ReadData",
        mapping(Operation::Read, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:WriteData",
        mapping(Operation::Write, ResourceType::Topic, true),
    ),
    (
        "kafka-cluster:WriteDataIdempotently",
        mapping(Operation::IdempotentWrite, ResourceType::Cluster, false),
    ),
];

fn index() -> &'static HashMap<&'static str, ActionMapping> {
    static INDEX: OnceLock<HashMap<&'static str, ActionMapping>> = OnceLock::new();
    INDEX.get_or_init(|| ACTION_MAPPINGS.iter().copied().collect())
}

/// Look up an IAM action. Surrounding whitespace is ignored; case is not.
pub fn lookup(iam_action: &str) -> Option<ActionMapping> {
    index().get(iam_action.trim()).copied()
}

/// Every table entry, in declaration order
pub fn all_mappings() -> impl Iterator<Item = (&'static str, ActionMapping)> {
    ACTION_MAPPINGS.iter().copied()
}

/// IAM actions that translate to the given Kafka tuple, sorted
pub fn actions_for(resource_type: ResourceType, operation: Operation) -> Vec<&'static str> {
    let mut actions: Vec<&'static str> = all_mappings()
        .filter(|(_, m)| m.resource_type == resource_type && m.operation == operation)
        .map(|(action, _)| action)
        .collect();
    actions.sort_unstable();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_known_action() {
        let m = lookup("kafka-cluster:ReadData").expect("ReadData is mapped");
        assert_eq!(m.operation, Operation::Read);
        assert_eq!(m.resource_type, ResourceType::Topic);
        assert!(m.requires_pattern);
    }

    #[test]
    fn test_lookup_trims_but_keeps_case() {
        assert!(lookup("  kafka-cluster:DescribeCluster\n").is_some());
        assert!(lookup("kafka-cluster:describecluster").is_none());
        assert!(lookup("kafka-cluster:Connect").is_none());
        assert!(lookup(WILDCARD_ACTION).is_none());
    }

    #[test]
    fn test_table_keys_are_unique_and_prefixed() {
        let keys: HashSet<&str> = all_mappings().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), ACTION_MAPPINGS.len());
        assert!(keys.iter().all(|k| k.starts_with(ACTION_PREFIX)));
    }

    #[test]
    fn test_cluster_actions_never_require_pattern() {
        for (action, m) in all_mappings() {
            if m.resource_type == ResourceType::Cluster {
                assert!(!m.requires_pattern, "{action} should not need a pattern");
            }
        }
    }

    #[test]
    fn test_actions_for_reverse_lookup() {
        assert_eq!(
            actions_for(ResourceType::Topic, Operation::Read),
            vec!["kafka-cluster:ReadData"]
        );
        assert_eq!(
            actions_for(ResourceType::Group, Operation::Read),
            vec!["kafka-cluster:AlterGroup"]
        );
        assert!(actions_for(ResourceType::Topic, Operation::All).is_empty());
    }

    #[test]
    fn test_every_mapping_reverse_resolves_to_itself() {
        for (action, m) in all_mappings() {
            assert!(actions_for(m.resource_type, m.operation).contains(&action));
        }
    }
}
