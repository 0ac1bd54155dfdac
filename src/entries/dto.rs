use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo_types::Entry;

/// Body of `POST /entries` and `PUT /entries/:id`.
///
/// On create, `paid_by` is ignored. On update, absent fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EntryPayload {
    pub date: Option<String>, // "YYYY-MM-DD", empty means today on create
    pub items: Option<String>,
    pub price: Option<Value>,
    pub paid_by: Option<String>,
    pub owed_all: Option<bool>,
    pub owed_by: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub message: &'static str,
    pub entry: Entry,
}
