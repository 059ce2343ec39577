// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod collection_store;
pub mod reorder_service;


pub use catalog_service::CatalogService;
pub use collection_store::{CollectionStore, Hydration};
pub use reorder_service::ReorderService;
