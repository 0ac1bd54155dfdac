use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::EntryPayload, repo_types::Entry};
use crate::{
    activities::services::record_activity,
    dates,
    error::{ApiError, ApiResult},
    store::Store,
};

fn not_found() -> ApiError {
    ApiError::NotFound("Entry not found".into())
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}

/// Ledger text for a requested entry date; empty or missing means today.
fn entry_date(requested: Option<&str>) -> ApiResult<String> {
    match requested.map(str::trim) {
        None | Some("") => Ok(dates::render_ledger_date(dates::now().date())),
        Some(iso) => dates::ledger_date_from_iso(iso),
    }
}

/// Every entry, latest date first. Entries whose date cannot be read are left out.
pub async fn list_entries(store: &dyn Store, caller: &str) -> ApiResult<Vec<Entry>> {
    let mut entries: Vec<Entry> = store
        .list_entries()
        .await?
        .into_iter()
        .filter(|e| {
            let readable = dates::parse_ledger_date(&e.date).is_some();
            if !readable {
                warn!(entry_id = %e.id, date = %e.date, "skipping entry with unreadable date");
            }
            readable
        })
        .collect();
    entries.sort_by(|a, b| dates::chronological_desc(&a.date, &b.date));

    record_activity(store, caller, "opened Hisaab").await?;
    Ok(entries)
}

pub async fn get_entry(store: &dyn Store, id: &str) -> ApiResult<Entry> {
    let id = parse_id(id)?;
    store.find_entry(id).await?.ok_or_else(not_found)
}

pub async fn create_entry(store: &dyn Store, caller: &str, payload: EntryPayload) -> ApiResult<Entry> {
    let items = payload
        .items
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("items is required".into()))?;
    let date = entry_date(payload.date.as_deref())?;

    let entry = Entry {
        id: Uuid::new_v4(),
        date,
        items,
        price: payload.price.unwrap_or(Value::Null),
        paid_by: caller.trim().to_lowercase(),
        owed_all: payload.owed_all.unwrap_or(false),
        owed_by: payload.owed_by.unwrap_or_default(),
        notes: payload.notes.unwrap_or_default(),
        created_by: caller.to_string(),
        created_at: dates::render_stamp(dates::now()),
        updated_at: String::new(),
        previous_versions: Vec::new(),
    };
    store.insert_entry(&entry).await?;
    record_activity(store, caller, &format!("created a new entry for {}", entry.items)).await?;

    info!(entry_id = %entry.id, %caller, "entry created");
    Ok(entry)
}

/// Loads an entry the caller is allowed to modify.
async fn load_owned(store: &dyn Store, caller: &str, id: &str, action: &str) -> ApiResult<Entry> {
    let entry = get_entry(store, id).await?;
    if entry.created_by != caller {
        warn!(entry_id = %entry.id, %caller, owner = %entry.created_by, "{action} forbidden");
        return Err(ApiError::Forbidden(format!(
            "You are not authorized to {action} this entry"
        )));
    }
    Ok(entry)
}

pub async fn update_entry(
    store: &dyn Store,
    caller: &str,
    id: &str,
    payload: EntryPayload,
) -> ApiResult<Entry> {
    let mut entry = load_owned(store, caller, id, "edit").await?;

    // only re-parse when the client actually sent a different date
    let date = match payload.date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() && d != entry.date => dates::ledger_date_from_iso(d)?,
        _ => entry.date.clone(),
    };

    let snapshot = entry.snapshot();
    entry.previous_versions.push(snapshot);
    entry.date = date;
    entry.updated_at = dates::render_stamp(dates::now());
    if let Some(items) = payload.items.filter(|i| !i.trim().is_empty()) {
        entry.items = items;
    }
    if let Some(price) = payload.price {
        entry.price = price;
    }
    if let Some(paid_by) = payload.paid_by.filter(|p| !p.trim().is_empty()) {
        entry.paid_by = paid_by;
    }
    if let Some(owed_all) = payload.owed_all {
        entry.owed_all = owed_all;
    }
    if let Some(owed_by) = payload.owed_by {
        entry.owed_by = owed_by;
    }
    if let Some(notes) = payload.notes {
        entry.notes = notes;
    }

    if !store.replace_entry(&entry).await? {
        return Err(not_found());
    }
    record_activity(store, caller, &format!("updated entry for {}", entry.items)).await?;

    info!(entry_id = %entry.id, %caller, versions = entry.previous_versions.len(), "entry updated");
    Ok(entry)
}

pub async fn delete_entry(store: &dyn Store, caller: &str, id: &str) -> ApiResult<()> {
    let entry = load_owned(store, caller, id, "delete").await?;
    if !store.delete_entry(entry.id).await? {
        return Err(not_found());
    }
    record_activity(store, caller, &format!("deleted entry for {}", entry.items)).await?;

    info!(entry_id = %entry.id, %caller, "entry deleted");
    Ok(())
}

/// Drops the whole ledger. Activities are kept and nothing is recorded.
pub async fn clear_all(store: &dyn Store, caller: &str) -> ApiResult<u64> {
    let removed = store.clear_entries().await?;
    warn!(%caller, removed, "ledger cleared");
    Ok(removed)
}
