//! Domain layer: match records, pagination, derived views, and the
//! incremental loader.
//!
//! Nothing in here performs I/O. The server slices pages with
//! [`MatchPage`]; clients accumulate them with [`MatchLoader`].

pub mod loader;
pub mod match_filter;
pub mod match_record;
pub mod page;

pub use loader::{LoadCursor, LoadState, LoaderSnapshot, MatchLoader, PageRequest};
pub use match_filter::MatchFilter;
pub use match_record::{Match, Video};
pub use page::{MatchPage, PAGE_SIZE, PageNumber};
