use crate::domain::model::{ScorerRecord, StoredScorer};
use crate::domain::policy::{MalformedRowPolicy, ScorePolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable persistence for scorer records. Only the three operations the core needs.
#[async_trait]
pub trait ScorerStore: Send + Sync {
    /// Persists every record and returns them with identities assigned. Must not drop records.
    async fn append_batch(&self, records: Vec<ScorerRecord>) -> Result<Vec<StoredScorer>>;

    /// Full snapshot in store order.
    async fn get_all(&self) -> Result<Vec<StoredScorer>>;

    /// Backends with an index override this; the default scans `get_all`.
    async fn find_by_name(&self, name: &str) -> Result<Option<StoredScorer>> {
        let snapshot = self.get_all().await?;
        Ok(crate::core::aggregate::find_by_name(&snapshot, name).cloned())
    }
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn database_path(&self) -> Option<&str>;
    fn delimiter(&self) -> char;
    fn score_policy(&self) -> ScorePolicy;
    fn malformed_row_policy(&self) -> MalformedRowPolicy;
    fn max_upload_bytes(&self) -> usize;
}
