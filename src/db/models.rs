use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::wardrobe::selections::WardrobeSelections;

#[derive(Debug, Clone, FromRow)]
pub struct StorageRow {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// A user-named snapshot of the whole selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPreset {
    pub id: String,
    pub name: String,
    pub selections: WardrobeSelections,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
