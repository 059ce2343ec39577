use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::collation::locale_compare;
use crate::domain::entry::Entry;
use crate::domain::item::MediaFormat;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortKey {
    #[default]
    Title,
    Score,
    Date,
    Format,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TITLE" | "TITLE_ROMAJI" => Ok(SortKey::Title),
            "SCORE" => Ok(SortKey::Score),
            "DATE" | "START_DATE" => Ok(SortKey::Date),
            "FORMAT" => Ok(SortKey::Format),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatFilter {
    #[default]
    All,
    Only(MediaFormat),
}

impl FormatFilter {
    pub fn accepts(&self, format: Option<MediaFormat>) -> bool {
        match self {
            FormatFilter::All => true,
            FormatFilter::Only(wanted) => format == Some(*wanted),
        }
    }
}

impl fmt::Display for FormatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatFilter::All => f.write_str("ALL"),
            FormatFilter::Only(format) => write!(f, "{}", format),
        }
    }
}

impl FromStr for FormatFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            return Ok(FormatFilter::All);
        }
        s.parse::<MediaFormat>().map(FormatFilter::Only)
    }
}

/// Declarative filter/sort settings for the query pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSortConfig {
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub format_filter: FormatFilter,
    pub min_score: u32,
}

impl FilterSortConfig {
    pub fn accepts(&self, entry: &Entry) -> bool {
        self.format_filter.accepts(entry.item.format()) && entry.score_or_zero() >= self.min_score
    }

    /// Comparator for the configured key and direction.
    /// DESC swaps the operands of the ASC comparator.
    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self.sort_direction {
            SortDirection::Asc => self.natural_order(a, b),
            SortDirection::Desc => self.natural_order(b, a),
        }
    }

    fn natural_order(&self, a: &Entry, b: &Entry) -> Ordering {
        match self.sort_key {
            SortKey::Title => locale_compare(
                a.item.resolved_title().unwrap_or(""),
                b.item.resolved_title().unwrap_or(""),
            ),
            SortKey::Format => locale_compare(format_key(a), format_key(b)),
            SortKey::Score => a.score_or_zero().cmp(&b.score_or_zero()),
            SortKey::Date => a.item.year().unwrap_or(0).cmp(&b.item.year().unwrap_or(0)),
        }
    }
}

fn format_key(entry: &Entry) -> &'static str {
    entry.item.format().map(|f| f.as_str()).unwrap_or("")
}
