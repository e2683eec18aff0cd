//! Domain logic for the Mural canvas: pricing, reservation decisions,
//! the generation status machine, and grid coordinate rules.
//!
//! This crate is pure — no I/O, no database types. The sqlx layer lives in
//! `mural-db` and the HTTP surface in `mural-api`.

pub mod error;
pub mod generation;
pub mod grid;
pub mod ledger;
pub mod pricing;
pub mod types;
