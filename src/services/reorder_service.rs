// src/services/reorder_service.rs
//
// Drives the reorder state machine against the Collection Store.
//
// The machine decides, the service applies:
// - committed moves go through `CollectionStore::move_to` (write-through)
// - live moves go through `preview_move_to` and are written by `Settle`
// - invalid gestures reset the machine and are only logged

use log::warn;
use std::time::Instant;

use crate::domain::{
    DomainError, GestureEvent, HitTest, ReorderConfig, ReorderEffect, ReorderMachine,
    ReorderState,
};
use crate::error::AppResult;
use crate::services::collection_store::CollectionStore;

pub struct ReorderService {
    machine: ReorderMachine,
}

impl ReorderService {
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            machine: ReorderMachine::new(config),
        }
    }

    pub fn state(&self) -> &ReorderState {
        self.machine.state()
    }

    /// When the driver should call `tick` next, if a long press is armed
    pub fn next_deadline(&self) -> Option<Instant> {
        self.machine.deadline()
    }

    /// Feed one input event and apply the resulting commands.
    ///
    /// Returns the effects so the driver can update visual-only state.
    pub fn handle(
        &mut self,
        store: &mut CollectionStore,
        event: GestureEvent,
        now: Instant,
        layout: &dyn HitTest,
    ) -> AppResult<Vec<ReorderEffect>> {
        match self.machine.handle(event, now, layout) {
            Ok(effects) => Ok(self.apply(store, effects)),
            Err(DomainError::InvalidGesture(reason)) => {
                warn!("ignored gesture: {}", reason);
                let effects = self.machine.reset();
                Ok(self.apply(store, effects))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fire the long-press timer if due
    pub fn tick(&mut self, store: &mut CollectionStore, now: Instant) -> Vec<ReorderEffect> {
        let effects = self.machine.poll(now);
        self.apply(store, effects)
    }

    /// Abandon the gesture in flight. Live moves already shown are kept and
    /// written, the on-screen order being authoritative.
    pub fn cancel(&mut self, store: &mut CollectionStore) -> Vec<ReorderEffect> {
        let effects = self.machine.reset();
        if let Err(e) = store.commit_pending() {
            warn!("reorder not saved after cancel: {}", e);
        }
        effects
    }

    fn apply(&self, store: &mut CollectionStore, effects: Vec<ReorderEffect>) -> Vec<ReorderEffect> {
        for effect in &effects {
            let outcome = match effect {
                ReorderEffect::Move(command) if command.live => {
                    store.preview_move_to(&command.source, &command.target, command.side);
                    Ok(())
                }
                ReorderEffect::Move(command) => store
                    .move_to(&command.source, &command.target, command.side)
                    .map(|_| ()),
                ReorderEffect::Settle { .. } => store.commit_pending().map(|_| ()),
                _ => Ok(()),
            };
            // Save failures already reached the user through RankingPersistFailed
            if let Err(e) = outcome {
                warn!("reorder not saved: {}", e);
            }
        }
        effects
    }
}
