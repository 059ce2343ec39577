use super::entity::{Item, ItemId};
use crate::domain::{DomainError, DomainResult};

/// Validates Item invariants
pub fn validate_item(item: &Item) -> DomainResult<()> {
    validate_item_id(item.id())
}

/// Text identifiers cannot be blank
fn validate_item_id(id: &ItemId) -> DomainResult<()> {
    if let ItemId::Text(text) = id {
        if text.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Item id cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}
