// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod entry;
pub mod item;
pub mod query;
pub mod ranking;
pub mod reorder;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Item Domain
pub use item::{
    validate_item, CoverImage, Item, ItemId, MediaFormat, MediaItem, MediaTitle, PersonItem,
    PersonName, FALLBACK_COVER, UNTITLED,
};

// Entry Domain (Query Pipeline input)
pub use entry::{Entry, ListStatus, MediaType};

// Ranking Domain
pub use ranking::{
    export_text, validate_sequence, DropSide, GridLayout, GridTile, RankedSequence, Relocation,
    DEFAULT_EXPORT_FILE_NAME, GRID_COLUMNS,
};

// Query Pipeline
pub use query::{FilterSortConfig, FormatFilter, SortDirection, SortKey};

// Reorder State Machine
pub use reorder::{
    ElementBounds, GestureEvent, HitTest, Modalities, MoveCommand, NoHits, Point, ReorderConfig,
    ReorderEffect, ReorderMachine, ReorderState, TouchId,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Item {0} is already in your list")]
    Duplicate(ItemId),

    #[error("Invalid gesture: {0}")]
    InvalidGesture(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Your list is empty")]
    EmptyRanking,
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
