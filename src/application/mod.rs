// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between a front end (the CLI) and the services
// - Commands accept DTOs and return DTOs
// - It translates between DTOs and domain entities

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
