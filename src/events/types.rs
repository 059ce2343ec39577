// src/events/types.rs
//
// All events emitted by the engine.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react (render notifications carry
//   the full ordered state so a renderer needs nothing else)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Entry, Item, ItemId};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ty, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { $name }
        }
    };
}

// ============================================================================
// RANKING EVENTS
// ============================================================================

/// What happened to the ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RankingChange {
    Restored,
    Added { item_id: ItemId, rank: usize },
    Removed { item_id: ItemId },
    Moved { item_id: ItemId, from: usize, to: usize },
    Replaced,
    Cleared,
}

/// Emitted after every ranking mutation and after hydration.
/// Carries the full ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub change: RankingChange,
    pub items: Vec<Item>,
}

impl RankingChanged {
    pub fn new(change: RankingChange, items: Vec<Item>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            change,
            items,
        }
    }
}

impl_domain_event!(RankingChanged, "RankingChanged");

/// Emitted when an add was refused because the id is already ranked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateRejected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_id: ItemId,
    pub title: String,
}

impl DuplicateRejected {
    pub fn new(item_id: ItemId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            item_id,
            title,
        }
    }
}

impl_domain_event!(DuplicateRejected, "DuplicateRejected");

/// Emitted when a write-through save failed.
/// The in-memory ranking keeps the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingPersistFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl RankingPersistFailed {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

impl_domain_event!(RankingPersistFailed, "RankingPersistFailed");

/// Emitted when the stored ranking could not be read back.
/// The stored payload is left untouched until the next mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingLoadFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl RankingLoadFailed {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

impl_domain_event!(RankingLoadFailed, "RankingLoadFailed");

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Emitted after every query pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: u64,
    /// Filtered and sorted entries to display
    pub entries: Vec<Entry>,
    /// Raw entries held before filtering
    pub fetched: usize,
}

impl CandidatesUpdated {
    pub fn new(request_id: u64, entries: Vec<Entry>, fetched: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            entries,
            fetched,
        }
    }

    /// Entries were fetched but the filters removed every one
    pub fn filtered_out(&self) -> bool {
        self.entries.is_empty() && self.fetched > 0
    }
}

impl_domain_event!(CandidatesUpdated, "CandidatesUpdated");

/// Emitted when a search or import failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: u64,
    pub message: String,
}

impl ProviderFailed {
    pub fn new(request_id: u64, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            message,
        }
    }
}

impl_domain_event!(ProviderFailed, "ProviderFailed");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let changed = RankingChanged::new(RankingChange::Cleared, Vec::new());
        assert_eq!(changed.event_type(), "RankingChanged");
        let failed = ProviderFailed::new(3, "boom".to_string());
        assert_eq!(failed.event_type(), "ProviderFailed");
    }

    #[test]
    fn test_filtered_out_distinguishes_empty_states() {
        assert!(!CandidatesUpdated::new(1, Vec::new(), 0).filtered_out());
        assert!(CandidatesUpdated::new(1, Vec::new(), 4).filtered_out());
    }
}
