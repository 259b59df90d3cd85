//! In-memory querying over a loaded record collection.

pub mod filter;
pub mod stats;

pub use filter::{filter_records, sort_newest_first, AnimalQuery};
pub use stats::{summarize, RecentReport, Stats, RECENT_LIMIT};
