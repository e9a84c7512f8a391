//! Service layer: business logic orchestration.
//!
//! [`MatchService`] fetches the upstream collection through a
//! [`crate::upstream::MatchSource`] and cuts it into pages.

pub mod match_service;

pub use match_service::MatchService;
