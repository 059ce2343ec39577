// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only

pub mod ranking_repository;

pub use ranking_repository::{
    decode_items, encode_items, RankingRepository, SqliteRankingRepository, DEFAULT_RANKING_SLOT,
};

#[cfg(test)]
pub use ranking_repository::MockRankingRepository;
