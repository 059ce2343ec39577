//! Query Pipeline: filter then stable sort of a fetched entry set.
//! Independent of the ranking; shares only the comparison helpers.

pub mod collation;
pub mod config;
pub mod pipeline;

pub use collation::locale_compare;
pub use config::{FilterSortConfig, FormatFilter, SortDirection, SortKey};
pub use pipeline::apply;
