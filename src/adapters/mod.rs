// Adapters layer: concrete scorer store backends.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::model::{ScorerRecord, StoredScorer};
use crate::domain::ports::ScorerStore;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Backend chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl AnyStore {
    pub fn open(database_path: Option<&str>) -> Result<Self> {
        match database_path {
            Some(path) => Ok(AnyStore::Sqlite(SqliteStore::open(path)?)),
            None => Ok(AnyStore::Memory(MemoryStore::new())),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyStore::Memory(_) => "memory",
            AnyStore::Sqlite(_) => "sqlite",
        }
    }
}

#[async_trait]
impl ScorerStore for AnyStore {
    async fn append_batch(&self, records: Vec<ScorerRecord>) -> Result<Vec<StoredScorer>> {
        match self {
            AnyStore::Memory(store) => store.append_batch(records).await,
            AnyStore::Sqlite(store) => store.append_batch(records).await,
        }
    }

    async fn get_all(&self) -> Result<Vec<StoredScorer>> {
        match self {
            AnyStore::Memory(store) => store.get_all().await,
            AnyStore::Sqlite(store) => store.get_all().await,
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<StoredScorer>> {
        match self {
            AnyStore::Memory(store) => store.find_by_name(name).await,
            AnyStore::Sqlite(store) => store.find_by_name(name).await,
        }
    }
}
