//! Critical Ranking Invariants:
//!
//! 1. No two elements share an id
//! 2. Insertion order is the ranking; new items always rank last
//! 3. Order changes only through add/remove/move/replace/clear
//! 4. An empty sequence is valid and distinct from "not yet loaded"

pub mod export;
pub mod grid;
pub mod invariants;
pub mod sequence;

pub use export::{export_text, DEFAULT_EXPORT_FILE_NAME};
pub use grid::{GridLayout, GridTile, GRID_COLUMNS};
pub use invariants::validate_sequence;
pub use sequence::{DropSide, RankedSequence, Relocation};
