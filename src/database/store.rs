use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::barang::{BarangBekas, BarangChanges, BarangDraft};
use crate::database::models::user::User;

/// Errors surfaced by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence capability for used-goods records.
///
/// Every operation is keyed by the owner identity; the `find_one_and_*`
/// operations resolve `(id, owner)` atomically, so a record owned by someone
/// else is indistinguishable from a record that does not exist.
#[async_trait]
pub trait BarangStore: Send + Sync {
    /// All records owned by `owner_id`, in store-defined order.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<BarangBekas>, StoreError>;

    /// Persist a new record and return it with its assigned id.
    async fn create(&self, draft: BarangDraft) -> Result<BarangBekas, StoreError>;

    /// Atomically update the record matching `(id, owner_id)`.
    /// Returns `None` when no record matches.
    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner_id: &str,
        changes: BarangChanges,
    ) -> Result<Option<BarangBekas>, StoreError>;

    /// Atomically delete the record matching `(id, owner_id)`.
    /// Returns `None` when no record matches.
    async fn find_one_and_delete(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<BarangBekas>, StoreError>;
}

/// Persistence capability for user accounts (token issuance flow).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Create a user. Fails with [`StoreError::Duplicate`] when the username
    /// is already registered.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
}
