// src/events/render.rs
//
// Render Sink adapter.
//
// The engine never renders. A sink is attached to the bus and receives the
// full ordered ranking after every mutation, the pipeline result after
// every query, and user-facing notices.

use std::sync::Arc;

use crate::domain::{Entry, Item, ItemId};
use crate::events::bus::EventBus;
use crate::events::types::{
    CandidatesUpdated, DuplicateRejected, ProviderFailed, RankingLoadFailed,
    RankingPersistFailed, RankingChanged,
};

/// Messages meant for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Duplicate { item_id: ItemId, title: String },
    ProviderError(String),
    SaveFailed(String),
    LoadFailed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Duplicate { title, .. } => write!(f, "\"{}\" is already in your list!", title),
            Notice::ProviderError(message) => write!(f, "Error: {}", message),
            Notice::SaveFailed(reason) => write!(f, "Could not save your list: {}", reason),
            Notice::LoadFailed(reason) => {
                write!(f, "Your saved list could not be read and was not loaded: {}", reason)
            }
        }
    }
}

pub trait RenderSink: Send + Sync {
    fn ranking_changed(&self, items: &[Item]);

    /// `fetched` is the raw entry count before filtering
    fn candidates_changed(&self, entries: &[Entry], fetched: usize);

    fn notice(&self, notice: Notice);
}

/// Subscribe `sink` to every render-relevant event on `bus`
pub fn attach_render_sink(bus: &EventBus, sink: Arc<dyn RenderSink>) {
    let s = Arc::clone(&sink);
    bus.subscribe::<RankingChanged, _>(move |event| s.ranking_changed(&event.items));

    let s = Arc::clone(&sink);
    bus.subscribe::<CandidatesUpdated, _>(move |event| {
        s.candidates_changed(&event.entries, event.fetched)
    });

    let s = Arc::clone(&sink);
    bus.subscribe::<DuplicateRejected, _>(move |event| {
        s.notice(Notice::Duplicate {
            item_id: event.item_id.clone(),
            title: event.title.clone(),
        })
    });

    let s = Arc::clone(&sink);
    bus.subscribe::<ProviderFailed, _>(move |event| {
        s.notice(Notice::ProviderError(event.message.clone()))
    });

    let s = Arc::clone(&sink);
    bus.subscribe::<RankingPersistFailed, _>(move |event| {
        s.notice(Notice::SaveFailed(event.reason.clone()))
    });

    bus.subscribe::<RankingLoadFailed, _>(move |event| {
        sink.notice(Notice::LoadFailed(event.reason.clone()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::RankingChange;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        rankings: Mutex<Vec<usize>>,
        notices: Mutex<Vec<Notice>>,
    }

    impl RenderSink for Recorder {
        fn ranking_changed(&self, items: &[Item]) {
            self.rankings.lock().unwrap().push(items.len());
        }

        fn candidates_changed(&self, _entries: &[Entry], _fetched: usize) {}

        fn notice(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    #[test]
    fn test_sink_receives_rankings_and_notices() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder::default());
        attach_render_sink(&bus, recorder.clone());

        bus.emit(RankingChanged::new(RankingChange::Cleared, Vec::new()));
        bus.emit(ProviderFailed::new(1, "Network error: 500".to_string()));

        assert_eq!(*recorder.rankings.lock().unwrap(), vec![0]);
        assert_eq!(
            *recorder.notices.lock().unwrap(),
            vec![Notice::ProviderError("Network error: 500".to_string())]
        );
    }
}
