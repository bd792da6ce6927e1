use std::sync::Arc;

use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::{BarangStore, StoreError, UserStore};

/// Shared handler state: the store capabilities behind Arc'd trait objects,
/// so any backend can satisfy them.
#[derive(Clone)]
pub struct AppState {
    pub barang: Arc<dyn BarangStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            barang: store.clone(),
            users: store,
        }
    }

    /// Pick the backend from the environment: BARANG_STORE=memory|postgres,
    /// defaulting to postgres whenever DATABASE_URL is set.
    pub async fn from_env() -> Result<Self, StoreError> {
        let use_postgres = match std::env::var("BARANG_STORE").ok().as_deref() {
            Some("postgres") => true,
            Some("memory") => false,
            _ => std::env::var("DATABASE_URL").is_ok(),
        };

        if use_postgres {
            let store = Arc::new(PgStore::connect().await?);
            Ok(Self {
                barang: store.clone(),
                users: store,
            })
        } else {
            tracing::info!("Using in-memory store");
            Ok(Self::in_memory())
        }
    }
}
