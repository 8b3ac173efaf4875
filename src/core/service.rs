use crate::core::aggregate::Aggregator;
use crate::core::ingest::BatchIngestor;
use crate::core::parser::RecordParser;
use crate::core::report;
use crate::domain::model::{IngestSummary, StoredScorer, TopScorers};
use crate::domain::ports::{ConfigProvider, ScorerStore};
use crate::domain::policy::MalformedRowPolicy;
use crate::utils::error::Result;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;

/// Ingestion and query entry point shared by the HTTP surface and the CLI.
pub struct ScorerService<S: ScorerStore + Clone> {
    ingestor: BatchIngestor<S>,
    aggregator: Aggregator<S>,
}

impl<S: ScorerStore + Clone> ScorerService<S> {
    pub fn new(store: S, parser: RecordParser, row_policy: MalformedRowPolicy) -> Self {
        Self {
            ingestor: BatchIngestor::new(store.clone(), parser, row_policy),
            aggregator: Aggregator::new(store),
        }
    }

    pub fn from_config<C: ConfigProvider>(store: S, config: &C) -> Self {
        let parser = RecordParser::new(config.delimiter(), config.score_policy());
        Self::new(store, parser, config.malformed_row_policy())
    }

    pub async fn ingest_content(
        &self,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<IngestSummary> {
        tracing::debug!("Ingesting {} bytes of text content", content.len());
        let summary = self.ingestor.ingest_text(content, cancel).await?;
        tracing::info!("Persisted {} scorers from content", summary.persisted.len());
        Ok(summary)
    }

    pub async fn ingest_stream<R>(&self, reader: R, cancel: &CancellationToken) -> Result<IngestSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let summary = self.ingestor.ingest_stream(reader, cancel).await?;
        tracing::info!("Persisted {} scorers from stream", summary.persisted.len());
        Ok(summary)
    }

    pub async fn top_scorers(&self, cancel: &CancellationToken) -> Result<TopScorers> {
        self.aggregator.top_scorers(cancel).await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<StoredScorer>> {
        self.aggregator.find_by_name(name, cancel).await
    }

    pub async fn export_top_scorers_csv(&self, cancel: &CancellationToken) -> Result<String> {
        let result = self.top_scorers(cancel).await?;
        report::to_csv(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::policy::ScorePolicy;

    fn service() -> ScorerService<MemoryStore> {
        ScorerService::new(
            MemoryStore::new(),
            RecordParser::new(',', ScorePolicy::DefaultToZero),
            MalformedRowPolicy::Skip,
        )
    }

    #[tokio::test]
    async fn test_ingest_then_query() {
        let service = service();
        let cancel = CancellationToken::new();

        service
            .ingest_content(
                "FirstName,SecondName,Score\\r\\nBrown,Njemza,10\\r\\nLiso,Mbiza,20",
                &cancel,
            )
            .await
            .unwrap();

        let top = service.top_scorers(&cancel).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top.scorers[0].record.first_name, "Liso");

        let found = service.find_by_name("MBIZA", &cancel).await.unwrap();
        assert_eq!(found.unwrap().record.score, 20);
        assert!(service
            .find_by_name("nomatch", &cancel)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reingesting_appends_a_second_copy() {
        let service = service();
        let cancel = CancellationToken::new();
        let input = "h\nA,B,5\nC,D,5";

        service.ingest_content(input, &cancel).await.unwrap();
        service.ingest_content(input, &cancel).await.unwrap();

        let top = service.top_scorers(&cancel).await.unwrap();
        assert_eq!(top.len(), 4);
    }

    #[tokio::test]
    async fn test_export_csv_uses_sorted_top_scorers() {
        let service = service();
        let cancel = CancellationToken::new();
        service
            .ingest_content("h\nZed,One,3\nAmy,Two,3\nBob,Three,1", &cancel)
            .await
            .unwrap();

        let csv = service.export_top_scorers_csv(&cancel).await.unwrap();

        assert_eq!(csv, "FirstName,SecondName,Score\nAmy,Two,3\nZed,One,3\n");
    }

    #[tokio::test]
    async fn test_from_config_applies_delimiter_and_score_policy() {
        let settings = crate::config::ServerSettings {
            delimiter: ';',
            score_policy: ScorePolicy::RejectRow,
            ..Default::default()
        };
        let service = ScorerService::from_config(MemoryStore::new(), &settings);
        let cancel = CancellationToken::new();

        let summary = service
            .ingest_content("h\nAmy;Pond;x\nRory;Williams;4\nRiver,Song,9", &cancel)
            .await
            .unwrap();

        assert_eq!(summary.persisted.len(), 1);
        assert_eq!(summary.persisted[0].record.second_name, "Williams");
        assert_eq!(summary.skipped.len(), 2);
    }
}
