use crate::core::checkpoint;
use crate::domain::model::{ScorerRecord, StoredScorer, TopScorers};
use crate::domain::ports::ScorerStore;
use crate::utils::error::Result;
use std::cmp::Ordering;
use tokio_util::sync::CancellationToken;

/// Every record holding the maximum score, sorted for display by first name.
///
/// First names compare case-insensitively, then case-sensitively; remaining
/// ties keep snapshot order. Returns `None` for an empty snapshot.
pub fn top_scorers<T>(records: &[T]) -> Option<(i64, Vec<T>)>
where
    T: AsRef<ScorerRecord> + Clone,
{
    let max_score = records.iter().map(|r| r.as_ref().score).max()?;

    let mut top: Vec<T> = records
        .iter()
        .filter(|r| r.as_ref().score == max_score)
        .cloned()
        .collect();
    top.sort_by(|a, b| compare_first_names(a.as_ref(), b.as_ref()));

    Some((max_score, top))
}

fn compare_first_names(a: &ScorerRecord, b: &ScorerRecord) -> Ordering {
    a.first_name
        .to_lowercase()
        .cmp(&b.first_name.to_lowercase())
        .then_with(|| a.first_name.cmp(&b.first_name))
}

/// First record whose first or second name equals `name`, ignoring case.
pub fn find_by_name<'a, T>(records: &'a [T], name: &str) -> Option<&'a T>
where
    T: AsRef<ScorerRecord>,
{
    records.iter().find(|r| r.as_ref().matches_name(name))
}

/// Read-side queries over a store snapshot. One store read per call.
pub struct Aggregator<S: ScorerStore> {
    store: S,
}

impl<S: ScorerStore> Aggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn top_scorers(&self, cancel: &CancellationToken) -> Result<TopScorers> {
        checkpoint(cancel)?;
        let snapshot = self.store.get_all().await?;
        tracing::debug!("Computing top scorers over {} records", snapshot.len());

        Ok(match top_scorers(&snapshot) {
            Some((max_score, scorers)) => TopScorers {
                max_score: Some(max_score),
                scorers,
            },
            None => TopScorers::default(),
        })
    }

    pub async fn find_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<StoredScorer>> {
        checkpoint(cancel)?;
        self.store.find_by_name(name).await
    }
}
