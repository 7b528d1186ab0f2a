use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::FlowType;

/// A user-defined transaction category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: FlowType,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Deduplication key: categories are unique per user by lowercased name
    /// and kind.
    pub fn key(&self) -> (String, FlowType) {
        (self.name.to_lowercase(), self.kind)
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub color: String,
    pub icon: String,
}
