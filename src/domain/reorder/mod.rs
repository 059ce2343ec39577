//! Reorder State Machine
//!
//! Pointer:  Idle -> PointerDragging -> Idle
//! Touch:    Idle -> TouchPending -> TouchDragging -> Idle
//!
//! Rules:
//! 1. A drag that never leaves its source commits nothing
//! 2. Only the first active touch drives the machine
//! 3. A pending long press is cancelled by any move or competing touch
//! 4. Every gesture ends in Idle with visual state released

pub mod gesture;
pub mod machine;

pub use gesture::{
    ElementBounds, GestureEvent, HitTest, MoveCommand, NoHits, Point, ReorderEffect, TouchId,
};
pub use machine::{Modalities, ReorderConfig, ReorderMachine, ReorderState, DEFAULT_LONG_PRESS};
