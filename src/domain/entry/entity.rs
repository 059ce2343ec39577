use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::item::Item;

/// Kind of catalog being searched or imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Anime,
    Manga,
    Character,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Anime => "ANIME",
            MediaType::Manga => "MANGA",
            MediaType::Character => "CHARACTER",
        }
    }

    /// Whether a user list of this type can be imported
    pub fn is_listable(&self) -> bool {
        !matches!(self, MediaType::Character)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANIME" => Ok(MediaType::Anime),
            "MANGA" => Ok(MediaType::Manga),
            "CHARACTER" => Ok(MediaType::Character),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

/// Membership status of an entry in a user's list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
}

impl ListStatus {
    pub const ALL: [ListStatus; 6] = [
        ListStatus::Current,
        ListStatus::Planning,
        ListStatus::Completed,
        ListStatus::Dropped,
        ListStatus::Paused,
        ListStatus::Repeating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Current => "CURRENT",
            ListStatus::Planning => "PLANNING",
            ListStatus::Completed => "COMPLETED",
            ListStatus::Dropped => "DROPPED",
            ListStatus::Paused => "PAUSED",
            ListStatus::Repeating => "REPEATING",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ListStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("Unknown list status: {}", s))
    }
}

/// A scored, tagged candidate prior to being ranked.
/// Entries are recomputed per query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub item: Item,
    /// Conventionally 0..=10; absent is treated as 0 by the query pipeline
    pub score: Option<u32>,
    /// Search results carry no membership status
    pub status: Option<ListStatus>,
}

impl Entry {
    /// A search hit: no score, no membership
    pub fn candidate(item: Item) -> Self {
        Self {
            item,
            score: None,
            status: None,
        }
    }

    pub fn listed(item: Item, score: Option<u32>, status: ListStatus) -> Self {
        Self {
            item,
            score,
            status: Some(status),
        }
    }

    pub fn score_or_zero(&self) -> u32 {
        self.score.unwrap_or(0)
    }
}
