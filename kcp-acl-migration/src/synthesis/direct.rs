//! Direct conversion of ACLs observed on the source cluster

use crate::parsing::clean_name;
use crate::types::{AclRecord, ObservedAcl};

/// Copy an observed ACL onto the output record shape.
///
/// Only the principal is rewritten to its clean name; the host is kept
/// because the source cluster already recorded a real one.
pub fn convert_observed(acl: &ObservedAcl) -> AclRecord {
    AclRecord {
        resource_type: acl.resource_type,
        resource_name: acl.resource_name.clone(),
        pattern_type: acl.pattern_type,
        principal: clean_name(&acl.principal),
        host: acl.host.clone(),
        operation: acl.operation,
        permission: acl.permission_type.clone(),
    }
}
