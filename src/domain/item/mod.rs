//! Item Invariants:
//!
//! 1. Identity is the `id`; two items with the same id are the same item
//! 2. Text ids are never blank
//! 3. Payload fields are read-only once an item is ranked

pub mod entity;
pub mod invariants;

pub use entity::{
    CoverImage, Item, ItemId, MediaFormat, MediaItem, MediaTitle, PersonItem, PersonName,
    FALLBACK_COVER, UNTITLED,
};
pub use invariants::validate_item;
