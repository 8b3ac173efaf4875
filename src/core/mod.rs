pub mod aggregate;
pub mod ingest;
pub mod parser;
pub mod report;
pub mod service;

pub use crate::domain::model::{IngestSummary, ScorerRecord, StoredScorer, TopScorers};
pub use crate::domain::ports::{ConfigProvider, ScorerStore};
pub use crate::utils::error::Result;

use crate::utils::error::ScorerError;
use tokio_util::sync::CancellationToken;

/// Cancellation point between store calls.
pub(crate) fn checkpoint(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(ScorerError::Cancelled);
    }
    Ok(())
}
