// src/repositories/ranking_repository.rs

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::Item;
use crate::error::{AppError, AppResult};

/// Storage slot holding the ranked sequence unless configured otherwise
pub const DEFAULT_RANKING_SLOT: &str = "ranked_items";

/// Persistence adapter for the ranked sequence.
///
/// `load` after `save(x)` must give back `x`, same content, same order.
#[cfg_attr(test, mockall::automock)]
pub trait RankingRepository: Send + Sync {
    /// Replace the stored sequence
    fn save(&self, items: &[Item]) -> AppResult<()>;

    /// `Ok(None)` when nothing was ever saved, `Err(Corrupt)` when the stored
    /// payload is not a sequence of well-formed items
    fn load(&self) -> AppResult<Option<Vec<Item>>>;
}

/// Serialize a sequence into its stored form
pub fn encode_items(items: &[Item]) -> AppResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Parse a stored payload, mapping any shape error to `Corrupt`
pub fn decode_items(payload: &str) -> AppResult<Vec<Item>> {
    serde_json::from_str(payload).map_err(|e| AppError::Corrupt(e.to_string()))
}

/// Ranked sequence stored as a JSON document in one key-value slot
pub struct SqliteRankingRepository {
    pool: Arc<ConnectionPool>,
    slot: String,
}

impl SqliteRankingRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self::with_slot(pool, DEFAULT_RANKING_SLOT)
    }

    pub fn with_slot(pool: Arc<ConnectionPool>, slot: impl Into<String>) -> Self {
        Self {
            pool,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Raw stored document, if any
    pub fn load_payload(&self) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        let payload = conn
            .query_row(
                "SELECT payload FROM storage_slots WHERE slot = ?1",
                params![self.slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(payload)
    }

    /// Overwrite the raw stored document
    pub fn save_payload(&self, payload: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO storage_slots (slot, payload, saved_at)
             VALUES (?1, ?2, ?3)",
            params![self.slot, payload, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }
}

impl RankingRepository for SqliteRankingRepository {
    fn save(&self, items: &[Item]) -> AppResult<()> {
        let payload = encode_items(items)?;
        self.save_payload(&payload)
    }

    fn load(&self) -> AppResult<Option<Vec<Item>>> {
        match self.load_payload()? {
            Some(payload) => decode_items(&payload).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, create_memory_pool, initialize_database};
    use crate::domain::{
        CoverImage, ItemId, MediaFormat, MediaItem, MediaTitle, PersonItem, PersonName,
    };

    fn repo() -> SqliteRankingRepository {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteRankingRepository::new(pool)
    }

    fn sample() -> Vec<Item> {
        vec![
            Item::Media(MediaItem {
                id: ItemId::Int(9253),
                title: MediaTitle {
                    romaji: Some("Steins;Gate".to_string()),
                    english: Some("Steins;Gate".to_string()),
                    native: None,
                },
                cover_image: CoverImage {
                    extra_large: None,
                    large: Some("https://img/sg.png".to_string()),
                },
                year: Some(2011),
                format: Some(MediaFormat::Tv),
            }),
            Item::Person(PersonItem {
                id: ItemId::character(35252),
                name: PersonName {
                    full: Some("Kurisu Makise".to_string()),
                    native: None,
                },
                image: None,
            }),
        ]
    }

    #[test]
    fn test_load_without_save_is_none() {
        assert!(repo().load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let repo = repo();
        let items = sample();
        repo.save(&items).unwrap();
        assert_eq!(repo.load().unwrap(), Some(items));
    }

    #[test]
    fn test_empty_sequence_is_distinct_from_absent() {
        let repo = repo();
        repo.save(&[]).unwrap();
        assert_eq!(repo.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_save_overwrites_previous() {
        let repo = repo();
        let mut items = sample();
        repo.save(&items).unwrap();
        items.reverse();
        repo.save(&items).unwrap();
        assert_eq!(repo.load().unwrap(), Some(items));
    }

    #[test]
    fn test_corrupt_payload_is_reported_and_kept() {
        let repo = repo();
        repo.save_payload(r#"[{"kind":"media","title":{}}]"#).unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, AppError::Corrupt(_)));
        // Reading never rewrites the slot
        assert_eq!(
            repo.load_payload().unwrap().as_deref(),
            Some(r#"[{"kind":"media","title":{}}]"#)
        );
    }

    #[test]
    fn test_slots_are_independent() {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let a = SqliteRankingRepository::with_slot(pool.clone(), "a");
        let b = SqliteRankingRepository::with_slot(pool, "b");

        a.save(&sample()).unwrap();
        assert!(b.load().unwrap().is_none());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.db");
        let items = sample();

        {
            let pool = Arc::new(create_connection_pool(&path).unwrap());
            initialize_database(&pool.get().unwrap()).unwrap();
            SqliteRankingRepository::new(pool).save(&items).unwrap();
        }

        let pool = Arc::new(create_connection_pool(&path).unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        assert_eq!(SqliteRankingRepository::new(pool).load().unwrap(), Some(items));
    }
}
