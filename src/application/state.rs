// src/application/state.rs

use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_connection, get_database_stats, initialize_database,
    verify_database_integrity, ConnectionPool,
};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{AniListClient, MediaProvider};
use crate::repositories::SqliteRankingRepository;
use crate::services::{CatalogService, CollectionStore, Hydration, ReorderService};

/// Session state shared by every command.
///
/// Constructed once at startup, hydrated after render sinks are attached,
/// flushed by `shutdown`.
pub struct AppState {
    pub config: AppConfig,
    pub event_bus: Arc<EventBus>,
    pub store: Mutex<CollectionStore>,
    pub reorder: Mutex<ReorderService>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Open the database and the AniList provider described by `config`
    pub fn bootstrap(config: AppConfig) -> AppResult<Self> {
        let db_path = config.resolve_database_path()?;
        info!("opening ranking database at {}", db_path.display());

        let pool = create_connection_pool(&db_path)?;
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            // A damaged file is still worth opening: hydration reports what it cannot read
            if let Err(e) = verify_database_integrity(&conn) {
                warn!("{}", e);
            }
            let stats = get_database_stats(&conn)?;
            debug!(
                "database schema v{}, {} bytes, {} slots",
                stats.schema_version, stats.size_bytes, stats.slot_count
            );
        }

        let provider: Arc<dyn MediaProvider> = Arc::new(AniListClient::new(config.provider.clone())?);
        Ok(Self::assemble(config, Arc::new(pool), provider))
    }

    /// Wire services over an already initialized pool
    pub fn assemble(
        config: AppConfig,
        pool: Arc<ConnectionPool>,
        provider: Arc<dyn MediaProvider>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let repo = Arc::new(SqliteRankingRepository::with_slot(pool, config.slot.clone()));

        Self {
            store: Mutex::new(CollectionStore::new(repo, event_bus.clone())),
            reorder: Mutex::new(ReorderService::new(config.reorder)),
            catalog: Arc::new(CatalogService::new(provider, event_bus.clone(), config.query)),
            event_bus,
            config,
        }
    }

    pub fn store(&self) -> MutexGuard<'_, CollectionStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reorder(&self) -> MutexGuard<'_, ReorderService> {
        self.reorder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hydrate(&self) -> Hydration {
        self.store().hydrate()
    }

    /// End any gesture in flight and write what is still unsaved
    pub fn shutdown(&self) -> AppResult<()> {
        let mut store = self.store();
        self.reorder().cancel(&mut store);
        store.flush()
    }
}
