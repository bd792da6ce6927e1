use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::barang::{BarangBekas, BarangChanges, BarangDraft};
use crate::database::models::user::User;
use crate::database::store::{BarangStore, StoreError, UserStore};

/// In-memory store backend for development and tests. The write lock makes
/// each find-and-mutate atomic, mirroring the per-row atomicity of the
/// Postgres backend.
#[derive(Default)]
pub struct MemoryStore {
    barang: RwLock<HashMap<Uuid, BarangBekas>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BarangStore for MemoryStore {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<BarangBekas>, StoreError> {
        let barang = self.barang.read().await;
        let mut records: Vec<BarangBekas> = barang
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        // Creation order, with id as tie-breaker for same-instant inserts
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(records)
    }

    async fn create(&self, draft: BarangDraft) -> Result<BarangBekas, StoreError> {
        let now = Utc::now();
        let record = BarangBekas {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            quantity: draft.quantity,
            date_added: draft.date_added,
            owner_id: draft.owner_id,
            created_at: now,
            updated_at: now,
        };

        let mut barang = self.barang.write().await;
        barang.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner_id: &str,
        changes: BarangChanges,
    ) -> Result<Option<BarangBekas>, StoreError> {
        let mut barang = self.barang.write().await;
        match barang.get_mut(&id) {
            Some(record) if record.owner_id == owner_id => {
                record.name = changes.name;
                record.description = changes.description;
                record.quantity = changes.quantity;
                record.date_added = changes.date_added;
                record.updated_at = Utc::now();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_one_and_delete(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<BarangBekas>, StoreError> {
        let mut barang = self.barang.write().await;
        let owned = barang
            .get(&id)
            .is_some_and(|record| record.owner_id == owner_id);
        if owned {
            Ok(barang.remove(&id))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::Duplicate("Username".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }
}
