use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config;
use crate::database::models::barang::{BarangBekas, BarangChanges, BarangDraft};
use crate::database::models::user::User;
use crate::database::store::{BarangStore, StoreError, UserStore};

const BARANG_COLUMNS: &str =
    "id, name, description, quantity, date_added, owner_id, created_at, updated_at";

const USER_COLUMNS: &str = "id, username, password_hash, created_at";

/// Postgres store backend. `(id, owner_id)` scoping lives in the WHERE
/// clause of single statements, so find-and-mutate is atomic per row.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using DATABASE_URL and run the bootstrap DDL.
    pub async fn connect() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Connected to Postgres store");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS barang_bekas (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                date_added DATE NOT NULL,
                owner_id TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS barang_bekas_owner_idx ON barang_bekas (owner_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl BarangStore for PgStore {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<BarangBekas>, StoreError> {
        let records = sqlx::query_as::<_, BarangBekas>(&format!(
            "SELECT {} FROM barang_bekas WHERE owner_id = $1 ORDER BY created_at, id",
            BARANG_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn create(&self, draft: BarangDraft) -> Result<BarangBekas, StoreError> {
        let record = sqlx::query_as::<_, BarangBekas>(&format!(
            "INSERT INTO barang_bekas (name, description, quantity, date_added, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            BARANG_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.quantity)
        .bind(draft.date_added)
        .bind(&draft.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner_id: &str,
        changes: BarangChanges,
    ) -> Result<Option<BarangBekas>, StoreError> {
        let record = sqlx::query_as::<_, BarangBekas>(&format!(
            "UPDATE barang_bekas
             SET name = $3, description = $4, quantity = $5, date_added = $6, updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING {}",
            BARANG_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.quantity)
        .bind(changes.date_added)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_one_and_delete(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<BarangBekas>, StoreError> {
        let record = sqlx::query_as::<_, BarangBekas>(&format!(
            "DELETE FROM barang_bekas WHERE id = $1 AND owner_id = $2 RETURNING {}",
            BARANG_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate("Username".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
