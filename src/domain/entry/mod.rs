pub mod entity;

pub use entity::{Entry, ListStatus, MediaType};
