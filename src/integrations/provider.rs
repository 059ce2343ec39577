// src/integrations/provider.rs
//
// Search/Import provider seam.
//
// Providers resolve or fail; failures carry a message fit for the user.
// Retry policy is the provider's own business.

use async_trait::async_trait;

use crate::domain::{Entry, Item, ListStatus, MediaType};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Free-text search over one catalog
    async fn search(&self, query: &str, media_type: MediaType) -> AppResult<Vec<Entry>>;

    /// Every entry of `username`'s list with the given membership status
    async fn fetch_user_entries(
        &self,
        username: &str,
        status: ListStatus,
        media_type: MediaType,
    ) -> AppResult<Vec<Entry>>;

    /// Single item by upstream id, `None` when it does not exist
    async fn fetch_item(&self, id: i64, media_type: MediaType) -> AppResult<Option<Item>>;
}
