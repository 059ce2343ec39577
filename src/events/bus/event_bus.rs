// src/events/bus/event_bus.rs
//
// Synchronous typed event bus.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers run on the emitting thread, in subscription order
// 2. Re-entrant - a handler may emit or subscribe; no lock is held while it runs
// 3. Observable - the most recent emissions are kept in a bounded log
// 4. Isolated - a panicking handler is logged and the others still run

use chrono::{DateTime, Utc};
use log::{debug, error};
use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

use crate::events::types::DomainEvent;

/// Emissions kept for inspection
pub const EVENT_LOG_CAPACITY: usize = 256;

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// One emission as seen by the bus
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub handler_count: usize,
}

/// Fan-out point between the engine and whatever renders it.
///
/// Cloning gives another handle onto the same subscriptions and log.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<Handler>>>>,
    log: Arc<Mutex<VecDeque<EventLogEntry>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future `E`.
    ///
    /// ```ignore
    /// bus.subscribe::<RankingChanged, _>(|event| {
    ///     log::info!("{} items ranked", event.items.len());
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Handler = Arc::new(move |event: &dyn Any| match event.downcast_ref::<E>() {
            Some(event) => handler(event),
            None => error!(
                "event routed to a handler for {}",
                std::any::type_name::<E>()
            ),
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Deliver `event` to every handler subscribed to its type.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        // Snapshot so handlers can subscribe or emit without deadlocking
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        debug!(
            "[EVENT] {} ({}) -> {} handlers",
            event.event_type(),
            event.event_id(),
            handlers.len()
        );
        self.record(EventLogEntry {
            event_type: event.event_type(),
            event_id: event.event_id(),
            occurred_at: event.occurred_at(),
            handler_count: handlers.len(),
        });

        for (index, handler) in handlers.iter().enumerate() {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any)
            }));
            if let Err(panic) = outcome {
                error!(
                    "handler {} for {} panicked: {:?}",
                    index,
                    event.event_type(),
                    panic
                );
            }
        }
    }

    /// Most recent emissions, oldest first
    pub fn recent_events(&self) -> Vec<EventLogEntry> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_log(&self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    fn record(&self, entry: EventLogEntry) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        if log.len() == EVENT_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cleared() -> RankingChanged {
        RankingChanged::new(RankingChange::Cleared, Vec::new())
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 1..=3 {
            let order = Arc::clone(&order);
            bus.subscribe::<RankingChanged, _>(move |_| order.lock().unwrap().push(n));
        }
        bus.emit(cleared());

        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_events_reach_only_their_type() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bus.subscribe::<ProviderFailed, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(cleared());
        bus.emit(ProviderFailed::new(1, "offline".to_string()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count::<ProviderFailed>(), 1);
        assert_eq!(bus.subscriber_count::<CandidatesUpdated>(), 0);
    }

    #[test]
    fn test_log_records_and_stays_bounded() {
        let bus = EventBus::new();
        bus.emit(cleared());
        bus.emit(ProviderFailed::new(1, "offline".to_string()));

        let types: Vec<_> = bus.recent_events().iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec!["RankingChanged", "ProviderFailed"]);

        for _ in 0..EVENT_LOG_CAPACITY {
            bus.emit(cleared());
        }
        let log = bus.recent_events();
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert!(log.iter().all(|e| e.event_type == "RankingChanged"));

        bus.clear_log();
        assert!(bus.recent_events().is_empty());
    }

    #[test]
    fn test_handler_may_emit() {
        let bus = EventBus::new();
        let relay = bus.clone();
        bus.subscribe::<DuplicateRejected, _>(move |event| {
            relay.emit(ProviderFailed::new(0, event.title.clone()));
        });

        bus.emit(DuplicateRejected::new(ItemId::Int(1), "Steins;Gate".to_string()));

        let types: Vec<_> = bus.recent_events().iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec!["DuplicateRejected", "ProviderFailed"]);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<RankingChanged, _>(|_| panic!("Intentional panic"));
        let counter = Arc::clone(&hits);
        bus.subscribe::<RankingChanged, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(cleared());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
