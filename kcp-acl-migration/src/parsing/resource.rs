//! Extraction of Kafka resource names and pattern types from MSK resource ARNs
//!
//! MSK resource ARNs look like
//! `arn:aws:kafka:<region>:<account>:topic/<cluster-name>/<cluster-uuid>/<topic>`.
//! Every input has a defined output; shapes we do not understand fall back to
//! the full wildcard `("*", LITERAL)`.

use log::debug;

use crate::types::{PatternType, ResourceType};

/// Resource name used for cluster-scoped ACLs
pub const CLUSTER_RESOURCE_NAME: &str = "kafka-cluster";

const WILDCARD: &str = "*";

/// Minimum path segments after the kind separator: cluster name, cluster id, leaf
const MIN_RESOURCE_SEGMENTS: usize = 3;

fn wildcard() -> (String, PatternType) {
    (WILDCARD.to_string(), PatternType::Literal)
}

/// Whether the identifier is `*` or carries a `:*` account/region wildcard
fn is_full_wildcard(resource: &str) -> bool {
    resource == WILDCARD || resource.contains(":*")
}

/// Parse one AWS resource identifier into a Kafka (name, pattern type) pair
pub fn extract_pattern(resource: &str, kind: ResourceType) -> (String, PatternType) {
    if is_full_wildcard(resource) {
        return wildcard();
    }

    let Some(separator) = kind.arn_separator() else {
        return (CLUSTER_RESOURCE_NAME.to_string(), PatternType::Literal);
    };

    let Some((_, remainder)) = resource.split_once(separator) else {
        debug!("Resource '{resource}' does not name a {kind}; using wildcard");
        return wildcard();
    };

    let segments: Vec<&str> = remainder.split('/').collect();
    if segments.len() < MIN_RESOURCE_SEGMENTS {
        debug!("Resource '{resource}' has too few path segments; using wildcard");
        return wildcard();
    }

    match segments.last() {
        Some(leaf) => determine_pattern(leaf),
        None => wildcard(),
    }
}

/// Resolve a leaf name to its pattern type.
///
/// Only a single trailing `*` becomes a prefix match.
/// Leading and embedded wildcards have no ACL equivalent and stay literal,
/// asterisk included.
pub fn determine_pattern(name: &str) -> (String, PatternType) {
    if name == WILDCARD {
        return wildcard();
    }

    if let Some(stripped) = name.strip_suffix('*') {
        // Any other star left over is embedded and cannot be a prefix
        if !stripped.contains('*') {
            return (stripped.to_string(), PatternType::Prefixed);
        }
    }

    (name.to_string(), PatternType::Literal)
}

/// Whether the identifier addresses resources of `kind` at all.
///
/// Full wildcards address every kind, and cluster ACLs have no sub-resource.
pub fn names_resource_kind(resource: &str, kind: ResourceType) -> bool {
    if is_full_wildcard(resource) {
        return true;
    }
    kind.arn_separator()
        .map_or(true, |separator| resource.contains(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOPIC_ARN: &str = "arn:aws:kafka:us-east-1:111:topic/c/cid/orders";

    #[rstest]
    #[case("retention-*", "retention-", PatternType::Prefixed)]
    #[case("*-suffix", "*-suffix", PatternType::Literal)]
    #[case("*", "*", PatternType::Literal)]
    #[case("exact", "exact", PatternType::Literal)]
    #[case("*both*", "*both*", PatternType::Literal)]
    #[case("in*fix", "in*fix", PatternType::Literal)]
    #[case("pre*mid-*", "pre*mid-*", PatternType::Literal)]
    #[case("double**", "double**", PatternType::Literal)]
    fn test_determine_pattern(
        #[case] name: &str,
        #[case] expected_name: &str,
        #[case] expected_type: PatternType,
    ) {
        assert_eq!(
            determine_pattern(name),
            (expected_name.to_string(), expected_type)
        );
    }

    #[test]
    fn test_extract_topic_name() {
        assert_eq!(
            extract_pattern(TOPIC_ARN, ResourceType::Topic),
            ("orders".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_extract_prefixed_topic() {
        let arn = "arn:aws:kafka:us-east-1:111:topic/c/cid/prefix-*";
        assert_eq!(
            extract_pattern(arn, ResourceType::Topic),
            ("prefix-".to_string(), PatternType::Prefixed)
        );
    }

    #[rstest]
    #[case(ResourceType::Cluster)]
    #[case(ResourceType::Topic)]
    #[case(ResourceType::Group)]
    #[case(ResourceType::TransactionalId)]
    fn test_full_wildcard_short_circuits(#[case] kind: ResourceType) {
        assert_eq!(
            extract_pattern("*", kind),
            ("*".to_string(), PatternType::Literal)
        );
        assert_eq!(
            extract_pattern("arn:aws:kafka:us-east-1:*", kind),
            ("*".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_cluster_kind_is_always_kafka_cluster() {
        let arn = "arn:aws:kafka:us-east-1:111:cluster/c/cid";
        assert_eq!(
            extract_pattern(arn, ResourceType::Cluster),
            ("kafka-cluster".to_string(), PatternType::Literal)
        );
        assert_eq!(
            extract_pattern(TOPIC_ARN, ResourceType::Cluster),
            ("kafka-cluster".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_group_and_transactional_id() {
        let group = "arn:aws:kafka:us-east-1:111:group/c/cid/billing-*";
        assert_eq!(
            extract_pattern(group, ResourceType::Group),
            ("billing-".to_string(), PatternType::Prefixed)
        );
        let txn = "arn:aws:kafka:us-east-1:111:transactional-id/c/cid/txn-1";
        assert_eq!(
            extract_pattern(txn, ResourceType::TransactionalId),
            ("txn-1".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_mismatched_kind_falls_back_to_wildcard() {
        assert_eq!(
            extract_pattern(TOPIC_ARN, ResourceType::Group),
            ("*".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_short_path_falls_back_to_wildcard() {
        let arn = "arn:aws:kafka:us-east-1:111:topic/c/orders";
        assert_eq!(
            extract_pattern(arn, ResourceType::Topic),
            ("*".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_extra_segments_take_last() {
        let arn = "arn:aws:kafka:us-east-1:111:topic/c/cid/extra/orders";
        assert_eq!(
            extract_pattern(arn, ResourceType::Topic),
            ("orders".to_string(), PatternType::Literal)
        );
    }

    #[test]
    fn test_names_resource_kind() {
        assert!(names_resource_kind(TOPIC_ARN, ResourceType::Topic));
        assert!(!names_resource_kind(TOPIC_ARN, ResourceType::Group));
        assert!(names_resource_kind(TOPIC_ARN, ResourceType::Cluster));
        assert!(names_resource_kind("*", ResourceType::TransactionalId));
    }
}
