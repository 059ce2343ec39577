use serde::Serialize;

use super::sequence::RankedSequence;

/// Number of columns in the grid preview
pub const GRID_COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridTile {
    pub rank: usize,
    pub label: String,
    pub title: String,
    pub cover: String,
}

/// Tile layout of the ranking preview.
/// The last row is padded with `empty_slots` blank tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub tiles: Vec<GridTile>,
    pub empty_slots: usize,
}

impl GridLayout {
    pub fn build(sequence: &RankedSequence) -> Self {
        let total = sequence.len();
        let rows = total.div_ceil(GRID_COLUMNS);
        let tiles = sequence
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| GridTile {
                rank: index + 1,
                label: format!("#{}", index + 1),
                title: item.display_title().to_string(),
                cover: item.cover_or_fallback().to_string(),
            })
            .collect();

        Self {
            columns: GRID_COLUMNS,
            rows,
            tiles,
            empty_slots: rows * GRID_COLUMNS - total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
