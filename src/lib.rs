//! # upcoming-matches
//!
//! Paginated upcoming-soccer-matches API and the incremental loader that
//! consumes it.
//!
//! The server fetches the complete match feed from an upstream JSON API on
//! every request and serves it in pages of nine. Clients accumulate pages
//! with a [`domain::MatchLoader`], advancing one page at a time until the
//! feed is exhausted, and filter the accumulated list locally.
//!
//! ## Architecture
//!
//! ```text
//! match-browser / any client
//!     │
//!     ├── MatchFeed (client/)        drives MatchLoader (domain/)
//!     ├── BackendClient (client/)
//!     │
//!   HTTP  GET /api/matches?page=N
//!     │
//!     ├── REST Handlers (api/)
//!     ├── MatchService (service/)    slices MatchPage (domain/)
//!     ├── MatchSource (upstream/)
//!     │
//!     └── Upstream JSON feed
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod upstream;
