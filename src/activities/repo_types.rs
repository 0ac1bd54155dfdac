use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit record of something a user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: String,
    pub date: String,       // "D/M/YY"
    pub activity: String,
    pub created_at: String, // "h:mm AM/PM - D/M/YY"
}
