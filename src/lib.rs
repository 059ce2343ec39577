// src/lib.rs
// AniRanker - personal ranked collection of anime, manga and characters
//
// Architecture:
// - Domain-centric: ranking, query pipeline and reorder rules live in domain/
// - Event-driven: services report every change on the event bus; renderers subscribe
// - Explicit: no implicit re-sorting, no ambient globals
// - Local-first: the ranking lives in a local SQLite database

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    export_text,
    // Ranking
    DropSide,
    // Entry
    Entry,
    // Query
    FilterSortConfig,
    FormatFilter,
    // Reorder
    GestureEvent,
    GridLayout,
    HitTest,
    // Item
    Item,
    ItemId,
    ListStatus,
    MediaFormat,
    MediaType,
    RankedSequence,
    ReorderConfig,
    ReorderEffect,
    SortDirection,
    SortKey,
};

// ============================================================================
// PUBLIC API - Errors
// ============================================================================

pub use domain::{DomainError, DomainResult};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    attach_render_sink, CandidatesUpdated, DomainEvent, EventBus, Notice,
    RankingChanged, RenderSink,
};

// ============================================================================
// PUBLIC API - Persistence
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use repositories::{RankingRepository, SqliteRankingRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{CatalogService, CollectionStore, Hydration, ReorderService};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;
pub use config::AppConfig;

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{AniListClient, AniListSettings, MediaProvider};
