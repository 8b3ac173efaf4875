use crate::domain::model::{ScorerRecord, StoredScorer};
use crate::domain::ports::ScorerStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    rows: Vec<StoredScorer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ScorerStore for MemoryStore {
    async fn append_batch(&self, records: Vec<ScorerRecord>) -> Result<Vec<StoredScorer>> {
        let mut state = self.state.write().await;
        let created_at = Utc::now();
        let mut appended = Vec::with_capacity(records.len());

        for record in records {
            state.last_id += 1;
            let stored = StoredScorer {
                id: state.last_id,
                record,
                created_at,
            };
            state.rows.push(stored.clone());
            appended.push(stored);
        }

        Ok(appended)
    }

    async fn get_all(&self) -> Result<Vec<StoredScorer>> {
        Ok(self.state.read().await.rows.clone())
    }
}
