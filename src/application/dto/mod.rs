// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are front-end-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO), requests excepted

use serde::{Deserialize, Serialize};

use crate::domain::{
    DropSide, Entry, FilterSortConfig, FormatFilter, GridLayout, Item, ListStatus, MediaType,
    SortDirection, SortKey,
};

// ============================================================================
// RANKING DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Media,
    Person,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItemDto {
    pub rank: usize,
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub cover: String,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

impl RankedItemDto {
    /// Row for the item at `index` in a list of `total` items
    pub fn from_ranked(item: &Item, index: usize, total: usize) -> Self {
        Self {
            rank: index + 1,
            id: item.id().to_string(),
            kind: match item {
                Item::Media(_) => ItemKind::Media,
                Item::Person(_) => ItemKind::Person,
            },
            title: item.display_title().to_string(),
            cover: item.cover_or_fallback().to_string(),
            year: item.year(),
            format: item.format().map(|f| f.to_string()),
            can_move_up: index > 0,
            can_move_down: index + 1 < total,
        }
    }

    pub fn list(items: &[Item]) -> Vec<Self> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Self::from_ranked(item, index, items.len()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemDto {
    pub id: i64,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveItemDto {
    pub id: String,
    pub target_id: String,
    pub side: DropSide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDto {
    pub file_name: String,
    pub content: String,
}

pub type GridDto = GridLayout;

// ============================================================================
// CATALOG DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDto {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub score: Option<u32>,
    pub status: Option<String>,
}

impl From<&Entry> for CandidateDto {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.item.id().to_string(),
            title: entry.item.display_title().to_string(),
            cover: entry.item.cover_or_fallback().to_string(),
            year: entry.item.year(),
            format: entry.item.format().map(|f| f.to_string()),
            score: entry.score,
            status: entry.status.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateListDto {
    pub candidates: Vec<CandidateDto>,
    /// Entries held before filtering
    pub fetched: usize,
    /// A newer request superseded this one; nothing was applied
    pub stale: bool,
}

impl CandidateListDto {
    pub fn from_entries(entries: &[Entry], fetched: usize) -> Self {
        Self {
            candidates: entries.iter().map(CandidateDto::from).collect(),
            fetched,
            stale: false,
        }
    }

    pub fn stale() -> Self {
        Self {
            candidates: Vec::new(),
            fetched: 0,
            stale: true,
        }
    }

    /// Entries were fetched but the filters hid all of them
    pub fn filtered_out(&self) -> bool {
        self.candidates.is_empty() && self.fetched > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequestDto {
    pub query: String,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequestDto {
    pub username: String,
    pub status: ListStatus,
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfigDto {
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub format_filter: FormatFilter,
    pub min_score: u32,
}

impl From<QueryConfigDto> for FilterSortConfig {
    fn from(dto: QueryConfigDto) -> Self {
        FilterSortConfig {
            sort_key: dto.sort_key,
            sort_direction: dto.sort_direction,
            format_filter: dto.format_filter,
            min_score: dto.min_score,
        }
    }
}
