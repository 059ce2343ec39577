// src/services/catalog_service.rs
//
// Catalog Service - candidate browsing
//
// Fetches raw entries from the provider, holds them, and runs the query
// pipeline over them whenever they or the filter/sort configuration change.
//
// CRITICAL RULES:
// - Every fetch is tagged with a request id; only the latest id may apply
// - Changing the configuration never refetches
// - Provider failures are surfaced as ProviderFailed, never retried here
// - Changing the requested list status discards held entries

use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::query::apply;
use crate::domain::{Entry, FilterSortConfig, Item, ListStatus, MediaType};
use crate::error::{AppError, AppResult};
use crate::events::{CandidatesUpdated, EventBus, ProviderFailed};
use crate::integrations::MediaProvider;

pub struct CatalogService {
    provider: Arc<dyn MediaProvider>,
    event_bus: Arc<EventBus>,
    config: Mutex<FilterSortConfig>,
    /// Raw entries of the last applied fetch, before filtering
    entries: Mutex<Vec<Entry>>,
    /// Membership status of the last import request
    import_status: Mutex<Option<ListStatus>>,
    latest_request: AtomicU64,
}

impl CatalogService {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        event_bus: Arc<EventBus>,
        config: FilterSortConfig,
    ) -> Self {
        Self {
            provider,
            event_bus,
            config: Mutex::new(config),
            entries: Mutex::new(Vec::new()),
            import_status: Mutex::new(None),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> FilterSortConfig {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn import_status(&self) -> Option<ListStatus> {
        *self.import_status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current pipeline output over the held entries
    pub fn results(&self) -> Vec<Entry> {
        apply(&self.entries(), &self.config())
    }

    /// Issue a new request id. Any response tagged with an older id is stale.
    pub fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    /// Apply a provider response.
    ///
    /// Returns `Ok(None)` when the response is stale and was discarded.
    pub fn apply_response(
        &self,
        request_id: u64,
        response: AppResult<Vec<Entry>>,
    ) -> AppResult<Option<Vec<Entry>>> {
        if request_id != self.latest_request() {
            warn!(
                "discarding stale response {} (latest is {})",
                request_id,
                self.latest_request()
            );
            return Ok(None);
        }

        match response {
            Ok(fetched) => {
                info!("request {} fetched {} entries", request_id, fetched.len());
                *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = fetched;
                Ok(Some(self.publish(request_id)))
            }
            Err(e) => {
                error!("request {} failed: {}", request_id, e);
                self.entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clear();
                self.event_bus
                    .emit(ProviderFailed::new(request_id, e.to_string()));
                Err(e)
            }
        }
    }

    /// Search the catalog. A blank query clears the candidates without a fetch.
    pub async fn search(
        &self,
        query: &str,
        media_type: MediaType,
    ) -> AppResult<Option<Vec<Entry>>> {
        let query = query.trim();
        if query.is_empty() {
            self.clear_entries();
            return Ok(Some(Vec::new()));
        }

        let request_id = self.begin_request();
        debug!("request {}: search {} \"{}\"", request_id, media_type, query);
        let response = self.provider.search(query, media_type).await;
        self.apply_response(request_id, response)
    }

    /// Import one status bucket of a user's list
    pub async fn import_user_list(
        &self,
        username: &str,
        status: ListStatus,
        media_type: MediaType,
    ) -> AppResult<Option<Vec<Entry>>> {
        let request_id = self.begin_request();
        *self.import_status.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);

        let username = username.trim();
        if username.is_empty() {
            return self.apply_response(
                request_id,
                Err(AppError::Provider("Please enter a username.".to_string())),
            );
        }

        debug!(
            "request {}: import {} {} list of {}",
            request_id, status, media_type, username
        );
        let response = self
            .provider
            .fetch_user_entries(username, status, media_type)
            .await;
        self.apply_response(request_id, response)
    }

    /// Replace the filter/sort configuration and re-run the pipeline over
    /// the held entries
    pub fn set_config(&self, config: FilterSortConfig) -> Vec<Entry> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config;
        self.publish(self.latest_request())
    }

    /// Select the membership status for the next import.
    ///
    /// A different status discards the held entries and makes in-flight
    /// responses stale. Returns whether anything was discarded.
    pub fn set_import_status(&self, status: ListStatus) -> bool {
        let previous = self
            .import_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(status);
        if previous == Some(status) {
            return false;
        }
        debug!("import status changed to {}, dropping held entries", status);
        self.clear_entries();
        true
    }

    /// Drop held entries. In-flight responses become stale.
    pub fn clear_entries(&self) {
        let request_id = self.begin_request();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.publish(request_id);
    }

    /// Look up a single item, outside the request sequence
    pub async fn fetch_item(&self, id: i64, media_type: MediaType) -> AppResult<Option<Item>> {
        self.provider.fetch_item(id, media_type).await
    }

    fn publish(&self, request_id: u64) -> Vec<Entry> {
        let fetched = self.entries();
        let shown = apply(&fetched, &self.config());
        self.event_bus.emit(CandidatesUpdated::new(
            request_id,
            shown.clone(),
            fetched.len(),
        ));
        shown
    }
}
