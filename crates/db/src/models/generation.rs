//! Generation request entity model and DTOs.

use mural_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full generation row from the `generations` table.
///
/// `token_cost` is the model price snapshotted at creation and never changes
/// afterwards, even if the pricing table does. Once `status` is terminal,
/// exactly one of `image_url` / `rejection_reason` / `error_message` is set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub model: String,
    pub size: String,
    pub status: String,
    pub token_cost: i32,
    pub image_url: Option<String>,
    pub rejection_reason: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a new generation request.
#[derive(Debug, Clone)]
pub struct CreateGeneration {
    pub user_id: DbId,
    pub prompt: String,
    pub model: String,
    pub size: String,
    pub token_cost: i32,
}
