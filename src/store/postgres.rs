use std::str::FromStr;

use anyhow::Context;
use axum::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use uuid::Uuid;

use super::Store;
use crate::activities::repo_types::Activity;
use crate::auth::repo_types::{RegistrationCode, User};
use crate::config::AppConfig;
use crate::entries::repo_types::{Entry, EntryRow};

const ENTRY_COLUMNS: &str = "id, date, items, price, paid_by, owed_all, owed_by, notes, \
                             created_by, created_at, updated_at, previous_versions";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let options = PgConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .database(&config.database_name);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(&user.created_at)
        .execute(&self.pool)
        .await
        .context("insert user")?;
        Ok(())
    }

    async fn list_usernames(&self) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(r#"SELECT username FROM users ORDER BY username COLLATE "C""#)
            .fetch_all(&self.pool)
            .await
            .context("list usernames")?;
        Ok(names)
    }

    async fn find_code(&self, code: &str) -> anyhow::Result<Option<RegistrationCode>> {
        let row = sqlx::query_as::<_, RegistrationCode>(
            r#"
            SELECT id, code, created_at
            FROM registration_codes
            WHERE code = $1
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("find registration code")?;
        Ok(row)
    }

    async fn insert_code(&self, code: &RegistrationCode) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registration_codes (id, code, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(code.id)
        .bind(&code.code)
        .bind(&code.created_at)
        .execute(&self.pool)
        .await
        .context("insert registration code")?;
        Ok(())
    }

    async fn list_entries(&self) -> anyhow::Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!("SELECT {ENTRY_COLUMNS} FROM entries"))
            .fetch_all(&self.pool)
            .await
            .context("list entries")?;
        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn find_entry(&self, id: Uuid) -> anyhow::Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find entry")?;
        Ok(row.map(Entry::from))
    }

    async fn insert_entry(&self, e: &Entry) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "INSERT INTO entries ({ENTRY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        ))
        .bind(e.id)
        .bind(&e.date)
        .bind(&e.items)
        .bind(&e.price)
        .bind(&e.paid_by)
        .bind(e.owed_all)
        .bind(&e.owed_by)
        .bind(&e.notes)
        .bind(&e.created_by)
        .bind(&e.created_at)
        .bind(&e.updated_at)
        .bind(sqlx::types::Json(&e.previous_versions))
        .execute(&self.pool)
        .await
        .context("insert entry")?;
        Ok(())
    }

    async fn replace_entry(&self, e: &Entry) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE entries
               SET date = $2, items = $3, price = $4, paid_by = $5, owed_all = $6,
                   owed_by = $7, notes = $8, updated_at = $9, previous_versions = $10
             WHERE id = $1
            "#,
        )
        .bind(e.id)
        .bind(&e.date)
        .bind(&e.items)
        .bind(&e.price)
        .bind(&e.paid_by)
        .bind(e.owed_all)
        .bind(&e.owed_by)
        .bind(&e.notes)
        .bind(&e.updated_at)
        .bind(sqlx::types::Json(&e.previous_versions))
        .execute(&self.pool)
        .await
        .context("update entry")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM entries WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete entry")?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_entries(&self) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM entries"#)
            .execute(&self.pool)
            .await
            .context("clear entries")?;
        Ok(result.rows_affected())
    }

    async fn insert_activity(&self, a: &Activity) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, "user", date, activity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(a.id)
        .bind(&a.user)
        .bind(&a.date)
        .bind(&a.activity)
        .bind(&a.created_at)
        .execute(&self.pool)
        .await
        .context("insert activity")?;
        Ok(())
    }

    async fn list_activities(&self) -> anyhow::Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            r#"SELECT id, "user", date, activity, created_at FROM activities"#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list activities")?;
        Ok(rows)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
