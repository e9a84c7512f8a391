//! Data Transfer Objects for REST request/response serialization.
//!
//! These are the wire shapes shared by the server handlers and the
//! backend client.

pub mod match_dto;

pub use match_dto::*;
