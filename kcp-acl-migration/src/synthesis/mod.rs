//! ACL synthesis (deterministic record generation)

pub mod direct;
pub mod translator;

pub use direct::convert_observed;
pub use translator::translate_statement;

use crate::types::{AclRecord, AclsByPrincipal};

/// Group records under their clean principal name, keeping per-principal order
pub fn group_by_principal(records: impl IntoIterator<Item = AclRecord>) -> AclsByPrincipal {
    let mut grouped = AclsByPrincipal::new();
    for record in records {
        grouped
            .entry(record.principal.clone())
            .or_default()
            .push(record);
    }
    grouped
}
