use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FlowType;

/// Category fields embedded in transaction listings. The reference is weak:
/// a deleted category leaves this as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: FlowType,
}

/// A transaction joined with its category, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub amount: Decimal,
    pub category_id: Option<Uuid>,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
}

/// Payload for creating or replacing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub amount: Decimal,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    pub transaction_date: NaiveDate,
}
