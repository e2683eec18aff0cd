//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts
//! - Response DTOs where the row itself is not the API shape

pub mod generation;
pub mod placement;
pub mod slot;
pub mod user;
