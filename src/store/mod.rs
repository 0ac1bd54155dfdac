use axum::async_trait;
use uuid::Uuid;

use crate::activities::repo_types::Activity;
use crate::auth::repo_types::{RegistrationCode, User};
use crate::entries::repo_types::Entry;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Access to the four persisted collections.
///
/// Each call is a single independent write or read; nothing spans calls.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn insert_user(&self, user: &User) -> anyhow::Result<()>;
    async fn list_usernames(&self) -> anyhow::Result<Vec<String>>;

    async fn find_code(&self, code: &str) -> anyhow::Result<Option<RegistrationCode>>;
    async fn insert_code(&self, code: &RegistrationCode) -> anyhow::Result<()>;

    async fn list_entries(&self) -> anyhow::Result<Vec<Entry>>;
    async fn find_entry(&self, id: Uuid) -> anyhow::Result<Option<Entry>>;
    async fn insert_entry(&self, entry: &Entry) -> anyhow::Result<()>;
    /// Overwrites the stored entry with the same id. Returns false if it vanished.
    async fn replace_entry(&self, entry: &Entry) -> anyhow::Result<bool>;
    async fn delete_entry(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Drops every entry, returning how many were removed.
    async fn clear_entries(&self) -> anyhow::Result<u64>;

    async fn insert_activity(&self, activity: &Activity) -> anyhow::Result<()>;
    async fn list_activities(&self) -> anyhow::Result<Vec<Activity>>;

    async fn close(&self) {}
}
