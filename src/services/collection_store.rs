// src/services/collection_store.rs
//
// Collection Store - owner of the ranked sequence for a session
//
// CRITICAL RULES:
// - Every mutation is written through to the repository before it is rendered
// - A failed write is reported but the in-memory change is kept
// - A payload that cannot be loaded is NEVER overwritten by hydration,
//   only by the next user mutation
// - Live (preview) moves are not persisted until `commit_pending`

use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::domain::{DomainError, DropSide, Item, ItemId, RankedSequence};
use crate::error::{AppError, AppResult};
use crate::events::{
    DuplicateRejected, EventBus, RankingChange, RankingChanged, RankingLoadFailed,
    RankingPersistFailed,
};
use crate::repositories::RankingRepository;

/// What hydration found in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// A stored sequence of this many items was loaded
    Restored(usize),
    /// Nothing was ever saved
    Empty,
    /// Storage could not be read; the previous state was kept
    Recovered { reason: String },
}

pub struct CollectionStore {
    sequence: RankedSequence,
    repo: Arc<dyn RankingRepository>,
    event_bus: Arc<EventBus>,
    hydrated: bool,
    unsaved: bool,
}

impl CollectionStore {
    pub fn new(repo: Arc<dyn RankingRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            sequence: RankedSequence::new(),
            repo,
            event_bus,
            hydrated: false,
            unsaved: false,
        }
    }

    pub fn items(&self) -> &[Item] {
        self.sequence.items()
    }

    pub fn sequence(&self) -> &RankedSequence {
        &self.sequence
    }

    /// An empty, hydrated store is a real empty list; before hydration it is "not loaded"
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Load the stored sequence. Never fails: unreadable storage is reported
    /// through `RankingLoadFailed` and the store keeps what it had.
    pub fn hydrate(&mut self) -> Hydration {
        let outcome = match self.repo.load() {
            Ok(None) => {
                info!("no stored ranking, starting empty");
                Hydration::Empty
            }
            Ok(Some(items)) => match self.sequence.replace_all(items) {
                Ok(()) => {
                    info!("restored ranking with {} items", self.sequence.len());
                    Hydration::Restored(self.sequence.len())
                }
                Err(e) => self.recover(AppError::Corrupt(e.to_string())),
            },
            Err(e) => self.recover(e),
        };

        self.hydrated = true;
        self.notify(RankingChange::Restored);
        outcome
    }

    /// Append an item as the last rank. Returns its 1-based rank.
    ///
    /// A duplicate id leaves the sequence untouched, emits
    /// `DuplicateRejected` and returns `DomainError::Duplicate`.
    pub fn add(&mut self, item: Item) -> AppResult<usize> {
        let title = item.display_title().to_string();
        let index = match self.sequence.add(item) {
            Ok(index) => index,
            Err(DomainError::Duplicate(id)) => {
                debug!("rejected duplicate {}", id);
                self.event_bus
                    .emit(DuplicateRejected::new(id.clone(), title));
                return Err(DomainError::Duplicate(id).into());
            }
            Err(e) => return Err(e.into()),
        };

        let item_id = self.sequence.items()[index].id().clone();
        self.commit(RankingChange::Added {
            item_id,
            rank: index + 1,
        })?;
        Ok(index + 1)
    }

    /// Remove by id. Returns false (and writes nothing) for an absent id.
    pub fn remove(&mut self, id: &ItemId) -> AppResult<bool> {
        if self.sequence.remove(id).is_none() {
            return Ok(false);
        }
        self.commit(RankingChange::Removed {
            item_id: id.clone(),
        })?;
        Ok(true)
    }

    /// Shift by `delta`. Out of range moves are a no-op without a write.
    pub fn move_by(&mut self, id: &ItemId, delta: isize) -> AppResult<bool> {
        let Some(relocation) = self.sequence.move_by(id, delta) else {
            return Ok(false);
        };
        self.commit(RankingChange::Moved {
            item_id: id.clone(),
            from: relocation.from,
            to: relocation.to,
        })?;
        Ok(true)
    }

    /// Splice `id` next to `target` and persist.
    pub fn move_to(&mut self, id: &ItemId, target: &ItemId, side: DropSide) -> AppResult<bool> {
        let Some(relocation) = self.sequence.move_to(id, target, side) else {
            return Ok(false);
        };
        self.commit(RankingChange::Moved {
            item_id: id.clone(),
            from: relocation.from,
            to: relocation.to,
        })?;
        Ok(true)
    }

    /// Splice and render without persisting. Used for live touch reordering;
    /// the final order is written once by `commit_pending`.
    pub fn preview_move_to(&mut self, id: &ItemId, target: &ItemId, side: DropSide) -> bool {
        let Some(relocation) = self.sequence.move_to(id, target, side) else {
            return false;
        };
        self.unsaved = true;
        self.notify(RankingChange::Moved {
            item_id: id.clone(),
            from: relocation.from,
            to: relocation.to,
        });
        true
    }

    /// Persist previewed moves. Returns false when there was nothing to write.
    pub fn commit_pending(&mut self) -> AppResult<bool> {
        if !self.unsaved {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Replace the whole sequence. A payload that breaks the sequence
    /// invariants is rejected as `Corrupt` and the current state is kept.
    pub fn replace_all(&mut self, items: Vec<Item>) -> AppResult<()> {
        self.sequence
            .replace_all(items)
            .map_err(|e| AppError::Corrupt(e.to_string()))?;
        self.commit(RankingChange::Replaced)
    }

    /// Empty the list. Confirmation is the caller's job.
    /// Clearing an empty list writes nothing.
    pub fn clear(&mut self) -> AppResult<bool> {
        if !self.sequence.clear() {
            return Ok(false);
        }
        self.commit(RankingChange::Cleared)?;
        Ok(true)
    }

    /// Final write at shutdown, only if something is still unsaved
    pub fn flush(&mut self) -> AppResult<()> {
        if self.unsaved {
            info!("flushing unsaved ranking");
            self.persist()?;
        }
        Ok(())
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn recover(&mut self, cause: AppError) -> Hydration {
        let reason = cause.to_string();
        warn!("stored ranking not loaded, keeping previous state: {}", reason);
        self.event_bus.emit(RankingLoadFailed::new(reason.clone()));
        Hydration::Recovered { reason }
    }

    fn commit(&mut self, change: RankingChange) -> AppResult<()> {
        let saved = self.persist();
        self.notify(change);
        saved
    }

    fn persist(&mut self) -> AppResult<()> {
        match self.repo.save(self.sequence.items()) {
            Ok(()) => {
                debug!("ranking saved ({} items)", self.sequence.len());
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                error!("failed to save ranking: {}", e);
                self.unsaved = true;
                self.event_bus.emit(RankingPersistFailed::new(e.to_string()));
                Err(e)
            }
        }
    }

    fn notify(&self, change: RankingChange) {
        self.event_bus
            .emit(RankingChanged::new(change, self.sequence.items().to_vec()));
    }
}
