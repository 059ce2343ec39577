// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod render;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Catalog
    CandidatesUpdated,
    // Ranking
    DuplicateRejected,
    ProviderFailed,
    RankingChange,
    RankingChanged,
    RankingLoadFailed,
    RankingPersistFailed,
};

pub use bus::{EventBus, EventLogEntry};

pub use render::{attach_render_sink, Notice, RenderSink};
