// src/config.rs
//
// Runtime configuration.
//
// Defaults describe a desktop install; the command line overrides them.

use std::path::PathBuf;

use crate::db::default_database_path;
use crate::domain::{FilterSortConfig, Modalities, ReorderConfig};
use crate::error::AppResult;
use crate::integrations::AniListSettings;
use crate::repositories::DEFAULT_RANKING_SLOT;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` resolves to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Storage slot holding the ranked sequence
    pub slot: String,
    pub provider: AniListSettings,
    pub reorder: ReorderConfig,
    /// Initial filter/sort configuration for browsed candidates
    pub query: FilterSortConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            slot: DEFAULT_RANKING_SLOT.to_string(),
            provider: AniListSettings::default(),
            reorder: ReorderConfig::default(),
            query: FilterSortConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = Some(path);
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.provider.base_url = url.into();
        self
    }

    pub fn with_modalities(mut self, modalities: Modalities, live_reorder: bool) -> Self {
        self.reorder.modalities = modalities;
        self.reorder.live_reorder = live_reorder;
        self
    }

    pub fn resolve_database_path(&self) -> AppResult<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}
