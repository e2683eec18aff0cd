//! Generation request status machine and input validation.
//!
//! Transitions are forward-only; the three terminal states are absorbing.
//! The database stores statuses as TEXT — [`GenerationStatus::as_str`] and
//! [`GenerationStatus::parse`] are the single source of the wire spelling.

use crate::error::CoreError;

/// Supported output sizes, width x height.
pub const VALID_SIZES: &[&str] = &["512x512", "768x768", "1024x1024"];

/// Status of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Queued,
    Generating,
    Approved,
    Rejected,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Generating => "generating",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }

    /// Parse a stored status string. Unknown spellings indicate a schema
    /// mismatch and surface as an internal error.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "queued" => Ok(Self::Queued),
            "generating" => Ok(Self::Generating),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!(
                "unknown generation status '{other}'"
            ))),
        }
    }

    /// Approved, rejected, and failed rows never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Failed)
    }

    /// Whether `self -> to` is a legal forward transition.
    pub fn can_transition(self, to: Self) -> bool {
        match (self, to) {
            (Self::Queued, Self::Generating) => true,
            (Self::Queued | Self::Generating, Self::Approved) => true,
            (Self::Queued | Self::Generating, Self::Rejected) => true,
            (Self::Queued | Self::Generating, Self::Failed) => true,
            _ => false,
        }
    }
}

/// Validate a requested output size against [`VALID_SIZES`].
pub fn validate_size(size: &str) -> Result<(), CoreError> {
    if VALID_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid size '{size}'. Must be one of: {}",
            VALID_SIZES.join(", ")
        )))
    }
}
