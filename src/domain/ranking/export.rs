use std::fmt::Write;

use super::sequence::RankedSequence;
use crate::domain::{DomainError, DomainResult};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "my-anime-list.txt";

/// Numbered plain-text listing, one `"{rank}. {title}"` line per item.
pub fn export_text(sequence: &RankedSequence) -> DomainResult<String> {
    if sequence.is_empty() {
        return Err(DomainError::EmptyRanking);
    }

    let mut content = String::new();
    for (index, item) in sequence.items().iter().enumerate() {
        // Writing into a String cannot fail
        let _ = writeln!(content, "{}. {}", index + 1, item.display_title());
    }
    Ok(content)
}
