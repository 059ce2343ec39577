use super::config::FilterSortConfig;
use crate::domain::entry::Entry;

/// Filter then stable-sort a raw entry set.
///
/// Pure: the input is never modified and equal inputs give equal outputs.
/// An empty result is a valid answer, not an error.
pub fn apply(entries: &[Entry], config: &FilterSortConfig) -> Vec<Entry> {
    let mut result: Vec<Entry> = entries
        .iter()
        .filter(|entry| config.accepts(entry))
        .cloned()
        .collect();

    // slice::sort_by is stable: equal keys keep their input order
    result.sort_by(|a, b| config.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::ListStatus;
    use crate::domain::item::{CoverImage, Item, ItemId, MediaFormat, MediaItem, MediaTitle};
    use crate::domain::query::{FormatFilter, SortDirection, SortKey};

    fn entry(id: i64, title: &str, score: Option<u32>, year: Option<i32>, format: MediaFormat) -> Entry {
        Entry::listed(
            Item::Media(MediaItem {
                id: ItemId::Int(id),
                title: MediaTitle {
                    romaji: Some(title.to_string()),
                    english: None,
                    native: None,
                },
                cover_image: CoverImage::default(),
                year,
                format: Some(format),
            }),
            score,
            ListStatus::Completed,
        )
    }

    fn bac() -> Vec<Entry> {
        vec![
            entry(1, "B", Some(5), Some(2010), MediaFormat::Tv),
            entry(2, "A", Some(8), Some(2004), MediaFormat::Movie),
            entry(3, "C", Some(5), None, MediaFormat::Tv),
        ]
    }

    fn titles(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.item.display_title()).collect()
    }

    fn config(sort_key: SortKey, sort_direction: SortDirection) -> FilterSortConfig {
        FilterSortConfig {
            sort_key,
            sort_direction,
            ..FilterSortConfig::default()
        }
    }

    #[test]
    fn test_score_desc_keeps_ties_stable() {
        let result = apply(&bac(), &config(SortKey::Score, SortDirection::Desc));
        assert_eq!(titles(&result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_min_score_filters() {
        let config = FilterSortConfig {
            min_score: 6,
            ..config(SortKey::Score, SortDirection::Desc)
        };
        assert_eq!(titles(&apply(&bac(), &config)), vec!["A"]);
    }

    #[test]
    fn test_absent_score_counts_as_zero() {
        let mut entries = bac();
        entries.push(entry(4, "D", None, None, MediaFormat::Ona));
        let kept = apply(&entries, &FilterSortConfig { min_score: 1, ..Default::default() });
        assert_eq!(kept.len(), 3);
        let all = apply(&entries, &config(SortKey::Score, SortDirection::Asc));
        assert_eq!(titles(&all)[0], "D");
    }

    #[test]
    fn test_title_sort_both_directions() {
        let asc = apply(&bac(), &config(SortKey::Title, SortDirection::Asc));
        assert_eq!(titles(&asc), vec!["A", "B", "C"]);
        let desc = apply(&bac(), &config(SortKey::Title, SortDirection::Desc));
        assert_eq!(titles(&desc), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_date_sort_treats_missing_year_as_zero() {
        let result = apply(&bac(), &config(SortKey::Date, SortDirection::Asc));
        assert_eq!(titles(&result), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_format_sort_and_filter() {
        let sorted = apply(&bac(), &config(SortKey::Format, SortDirection::Asc));
        assert_eq!(titles(&sorted), vec!["A", "B", "C"]);

        let only_tv = FilterSortConfig {
            format_filter: FormatFilter::Only(MediaFormat::Tv),
            ..FilterSortConfig::default()
        };
        assert_eq!(titles(&apply(&bac(), &only_tv)), vec!["B", "C"]);
    }

    #[test]
    fn test_empty_after_filter_is_not_an_error() {
        let config = FilterSortConfig {
            min_score: 11,
            ..FilterSortConfig::default()
        };
        assert!(apply(&bac(), &config).is_empty());
        assert!(apply(&[], &FilterSortConfig::default()).is_empty());
    }

    #[test]
    fn test_apply_is_pure() {
        let entries = bac();
        let snapshot = entries.clone();
        let config = config(SortKey::Score, SortDirection::Desc);
        let first = apply(&entries, &config);
        let second = apply(&entries, &config);
        assert_eq!(first, second);
        assert_eq!(entries, snapshot);
    }
}
