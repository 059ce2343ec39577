use serde::{Deserialize, Serialize};

use super::invariants::validate_sequence;
use crate::domain::item::{validate_item, Item, ItemId};
use crate::domain::{DomainError, DomainResult};

/// Side of a target element an item is dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropSide {
    Before,
    After,
}

/// A relocation that actually changed the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub from: usize,
    pub to: usize,
}

/// Ordered, id-unique list of items. Index 0 is rank 1.
///
/// Order only changes through the explicit operations below, never by
/// sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedSequence {
    items: Vec<Item>,
}

impl RankedSequence {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build from a loaded payload, rejecting payloads that break invariants
    pub fn from_items(items: Vec<Item>) -> DomainResult<Self> {
        validate_sequence(&items)?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Append as the last rank. Returns the new item's index.
    pub fn add(&mut self, item: Item) -> DomainResult<usize> {
        validate_item(&item)?;
        if self.contains(item.id()) {
            return Err(DomainError::Duplicate(item.id().clone()));
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Remove by id. Absent ids are a no-op.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Shift an item by `delta` positions.
    ///
    /// A single step is a positional exchange with the neighbour. Out of
    /// range targets are a no-op: no clamping, no wraparound.
    pub fn move_by(&mut self, id: &ItemId, delta: isize) -> Option<Relocation> {
        if delta == 0 {
            return None;
        }
        let from = self.position(id)?;
        let to = from.checked_add_signed(delta)?;
        if to >= self.items.len() {
            return None;
        }
        if delta.abs() == 1 {
            self.items.swap(from, to);
        } else {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        Some(Relocation { from, to })
    }

    /// Splice `id` out and reinsert it immediately before or after `target`.
    ///
    /// Returns `None` when either id is absent, when they are equal, or when
    /// the splice leaves the order unchanged.
    pub fn move_to(&mut self, id: &ItemId, target: &ItemId, side: DropSide) -> Option<Relocation> {
        if id == target {
            return None;
        }
        let from = self.position(id)?;
        if !self.contains(target) {
            return None;
        }

        let item = self.items.remove(from);
        // Target index is taken after removal so the splice is atomic
        let target_index = self
            .position(target)
            .unwrap_or(self.items.len());
        let to = match side {
            DropSide::Before => target_index,
            DropSide::After => target_index + 1,
        };
        self.items.insert(to, item);

        if from == to {
            None
        } else {
            Some(Relocation { from, to })
        }
    }

    /// Replace every element. On error the current contents are kept.
    pub fn replace_all(&mut self, items: Vec<Item>) -> DomainResult<()> {
        validate_sequence(&items)?;
        self.items = items;
        Ok(())
    }

    /// Empty the sequence. Returns false when it was already empty.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }
}
