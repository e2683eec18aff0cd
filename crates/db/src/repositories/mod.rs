//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return `sqlx::Error` raw —
//! business-rule interpretation happens in [`crate::services`].

pub mod generation_repo;
pub mod placement_repo;
pub mod slot_repo;
pub mod user_repo;

pub use generation_repo::GenerationRepo;
pub use placement_repo::PlacementRepo;
pub use slot_repo::SlotRepo;
pub use user_repo::UserRepo;
