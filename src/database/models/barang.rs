use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A used-goods inventory record. `owner_id` is set once at creation and
/// never changes; `id` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BarangBekas {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub date_added: NaiveDate,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a record.
#[derive(Debug, Clone)]
pub struct BarangDraft {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub date_added: NaiveDate,
    pub owner_id: String,
}

/// The four mutable fields an update may change. Owner and id are not here.
#[derive(Debug, Clone)]
pub struct BarangChanges {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub date_added: NaiveDate,
}
