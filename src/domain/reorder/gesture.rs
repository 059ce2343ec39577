use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;
use crate::domain::ranking::DropSide;

/// Identifier of one finger for the lifetime of its contact
pub type TouchId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of one rendered list element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub id: ItemId,
    pub top: f64,
    pub height: f64,
}

impl ElementBounds {
    /// Above the vertical midpoint is `Before`, the midpoint and below is `After`
    pub fn side_of(&self, y: f64) -> DropSide {
        if y < self.top + self.height / 2.0 {
            DropSide::Before
        } else {
            DropSide::After
        }
    }
}

/// Resolves the topmost list element under a screen point.
/// Implemented by whatever owns the rendered layout.
pub trait HitTest {
    fn element_at(&self, point: Point) -> Option<ElementBounds>;
}

/// A layout that hits nothing. Useful for pointer-only drivers.
pub struct NoHits;

impl HitTest for NoHits {
    fn element_at(&self, _point: Point) -> Option<ElementBounds> {
        None
    }
}

/// Low-level input events fed to the reorder machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    DragStart { source: ItemId },
    DragOver { target: ItemId },
    /// `side` is `None` when the driver does not track the pointer offset
    Drop { target: ItemId, side: Option<DropSide> },
    DragEnd,
    TouchStart { touch: TouchId, source: ItemId },
    TouchMove { touch: TouchId, point: Point },
    TouchEnd { touch: TouchId },
    TouchCancel { touch: TouchId },
}

/// "Move `source` to the `side` of `target`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub source: ItemId,
    pub target: ItemId,
    pub side: DropSide,
    /// Live moves are visual feedback during a touch drag and are persisted
    /// once by the `Settle` that ends the gesture
    pub live: bool,
}

/// Outputs of the reorder machine, applied in order by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReorderEffect {
    /// Mark the source element as being dragged
    Lift { source: ItemId },
    /// Long press recognised; non-blocking acknowledgement such as haptics
    Acknowledge,
    /// Current drag target may accept a drop
    DropAllowed { target: ItemId },
    Move(MoveCommand),
    /// Touch gesture over after live moves: persist the final order once
    Settle { source: ItemId },
    /// Clear every visual-only drag state
    Release,
}
