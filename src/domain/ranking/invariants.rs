use std::collections::HashSet;

use crate::domain::item::{validate_item, Item};
use crate::domain::{DomainError, DomainResult};

/// Validates a full sequence: every item valid, no id seen twice.
pub fn validate_sequence(items: &[Item]) -> DomainResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_item(item)?;
        if !seen.insert(item.id()) {
            return Err(DomainError::InvariantViolation(format!(
                "Item {} appears more than once",
                item.id()
            )));
        }
    }
    Ok(())
}
