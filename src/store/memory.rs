use axum::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::activities::repo_types::Activity;
use crate::auth::repo_types::{RegistrationCode, User};
use crate::entries::repo_types::Entry;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    codes: Vec<RegistrationCode>,
    entries: Vec<Entry>,
    activities: Vec<Activity>,
}

/// Insertion-ordered in-memory collections.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, username: &str) -> anyhow::Result<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> anyhow::Result<()> {
        let mut c = self.inner.write().await;
        anyhow::ensure!(
            !c.users.iter().any(|u| u.username == user.username),
            "duplicate username {}",
            user.username
        );
        c.users.push(user.clone());
        Ok(())
    }

    async fn list_usernames(&self) -> anyhow::Result<Vec<String>> {
        let c = self.inner.read().await;
        let mut names: Vec<String> = c.users.iter().map(|u| u.username.clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn find_code(&self, code: &str) -> anyhow::Result<Option<RegistrationCode>> {
        let c = self.inner.read().await;
        Ok(c.codes.iter().find(|rc| rc.code == code).cloned())
    }

    async fn insert_code(&self, code: &RegistrationCode) -> anyhow::Result<()> {
        self.inner.write().await.codes.push(code.clone());
        Ok(())
    }

    async fn list_entries(&self) -> anyhow::Result<Vec<Entry>> {
        Ok(self.inner.read().await.entries.clone())
    }

    async fn find_entry(&self, id: Uuid) -> anyhow::Result<Option<Entry>> {
        let c = self.inner.read().await;
        Ok(c.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_entry(&self, entry: &Entry) -> anyhow::Result<()> {
        self.inner.write().await.entries.push(entry.clone());
        Ok(())
    }

    async fn replace_entry(&self, entry: &Entry) -> anyhow::Result<bool> {
        let mut c = self.inner.write().await;
        match c.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                // created_by/created_at are not part of the update, mirror the SQL UPDATE
                let created_by = std::mem::take(&mut slot.created_by);
                let created_at = std::mem::take(&mut slot.created_at);
                *slot = Entry {
                    created_by,
                    created_at,
                    ..entry.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_entry(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut c = self.inner.write().await;
        let before = c.entries.len();
        c.entries.retain(|e| e.id != id);
        Ok(c.entries.len() < before)
    }

    async fn clear_entries(&self) -> anyhow::Result<u64> {
        let mut c = self.inner.write().await;
        let n = c.entries.len() as u64;
        c.entries.clear();
        Ok(n)
    }

    async fn insert_activity(&self, activity: &Activity) -> anyhow::Result<()> {
        self.inner.write().await.activities.push(activity.clone());
        Ok(())
    }

    async fn list_activities(&self) -> anyhow::Result<Vec<Activity>> {
        Ok(self.inner.read().await.activities.clone())
    }
}
