use crate::types::DbId;

/// Domain error for ledger, generation, and placement operations.
///
/// Business-rule failures carry the data the presentation layer needs to
/// render a precise message (remaining cooldown, missing balance) without
/// string matching — the HTTP layer maps each variant to a stable
/// machine-readable code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported model '{0}'")]
    UnsupportedModel(String),

    /// The caller's cooldown window has not elapsed yet.
    #[error("Cooldown active, retry in {remaining_secs}s")]
    CooldownActive { remaining_secs: i64 },

    /// The caller's balance cannot cover the model cost.
    #[error("Insufficient tokens: need {required}, have {available}")]
    InsufficientTokens { required: i32, available: i32 },

    /// The ledger CAS lost every attempt. Transient — the balance and
    /// cooldown checks themselves passed on each snapshot.
    #[error("Ledger contention: {attempts} attempts exhausted")]
    Contention { attempts: u32 },

    /// A concurrent placement redirected the slot first.
    #[error("Slot ({z}, {x}, {y}) was claimed by a concurrent placement")]
    SlotConflict { z: i32, x: i32, y: i32 },

    #[error("Generation is '{status}', only approved generations can be placed")]
    GenerationNotApproved { status: String },

    #[error("Generation has no image URL")]
    MissingImage,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
