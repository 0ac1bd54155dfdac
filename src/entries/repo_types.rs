use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Expense entry as stored, with its edit history embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub date: String,             // "D/M/YY"
    pub items: String,
    pub price: Value,             // number or numeric string, kept as sent
    pub paid_by: String,
    pub owed_all: bool,
    pub owed_by: Vec<String>,
    pub notes: String,
    pub created_by: String,
    pub created_at: String,       // "h:mm AM/PM - D/M/YY"
    pub updated_at: String,       // "" until the first update
    pub previous_versions: Vec<EntrySnapshot>,
}

/// Frozen copy of an entry taken right before an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub date: String,
    pub items: String,
    pub paid_by: String,
    pub price: Value,
    pub owed_all: bool,
    pub owed_by: Vec<String>,
    pub notes: String,
    pub updated_at: String,
    pub created_at: String,
    pub created_by: String,
}

impl Entry {
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            date: self.date.clone(),
            items: self.items.clone(),
            paid_by: self.paid_by.clone(),
            price: self.price.clone(),
            owed_all: self.owed_all,
            owed_by: self.owed_by.clone(),
            notes: self.notes.clone(),
            updated_at: self.updated_at.clone(),
            created_at: self.created_at.clone(),
            created_by: self.created_by.clone(),
        }
    }
}

/// Row shape of the `entries` table.
#[derive(Debug, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub date: String,
    pub items: String,
    pub price: Value,
    pub paid_by: String,
    pub owed_all: bool,
    pub owed_by: Vec<String>,
    pub notes: String,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub previous_versions: sqlx::types::Json<Vec<EntrySnapshot>>,
}

impl From<EntryRow> for Entry {
    fn from(r: EntryRow) -> Self {
        Self {
            id: r.id,
            date: r.date,
            items: r.items,
            price: r.price,
            paid_by: r.paid_by,
            owed_all: r.owed_all,
            owed_by: r.owed_by,
            notes: r.notes,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
            previous_versions: r.previous_versions.0,
        }
    }
}
