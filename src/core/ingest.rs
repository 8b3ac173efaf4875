use crate::core::checkpoint;
use crate::core::parser::RecordParser;
use crate::domain::model::{IngestSummary, ParseOutcome, ParsedBatch, SkippedLine};
use crate::domain::policy::MalformedRowPolicy;
use crate::domain::ports::ScorerStore;
use crate::utils::error::{Result, ScorerError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

/// Upstream producers sometimes double-encode line breaks, so the text form
/// of `\r\n` separates lines as well.
pub const ESCAPED_CRLF: &str = "\\r\\n";

/// Splits a text blob into logical lines on `\n`, `\r\n` and literal `\r\n` text.
pub fn split_logical_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split(ESCAPED_CRLF))
}

/// Parses header-prefixed scorer input and appends the accepted records to a store.
pub struct BatchIngestor<S: ScorerStore> {
    store: S,
    parser: RecordParser,
    row_policy: MalformedRowPolicy,
}

impl<S: ScorerStore> BatchIngestor<S> {
    pub fn new(store: S, parser: RecordParser, row_policy: MalformedRowPolicy) -> Self {
        Self {
            store,
            parser,
            row_policy,
        }
    }

    pub fn parse_text(&self, text: &str) -> Result<ParsedBatch> {
        let mut collector = BatchCollector::new(&self.parser, self.row_policy);
        for line in split_logical_lines(text) {
            collector.push(line)?;
        }
        Ok(collector.finish())
    }

    /// Reads one line at a time so large uploads are never held as a single string.
    ///
    /// Lines are decoded lossily: bytes that are not UTF-8 become U+FFFD and
    /// the row still goes through the parser.
    pub async fn parse_stream<R>(&self, mut reader: R, cancel: &CancellationToken) -> Result<ParsedBatch>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut collector = BatchCollector::new(&self.parser, self.row_policy);
        let mut buf = Vec::new();
        loop {
            checkpoint(cancel)?;
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            collector.push(&String::from_utf8_lossy(&buf))?;
        }
        Ok(collector.finish())
    }

    pub async fn ingest_text(&self, text: &str, cancel: &CancellationToken) -> Result<IngestSummary> {
        checkpoint(cancel)?;
        let batch = self.parse_text(text)?;
        self.persist(batch, cancel).await
    }

    pub async fn ingest_stream<R>(&self, reader: R, cancel: &CancellationToken) -> Result<IngestSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let batch = self.parse_stream(reader, cancel).await?;
        self.persist(batch, cancel).await
    }

    async fn persist(&self, batch: ParsedBatch, cancel: &CancellationToken) -> Result<IngestSummary> {
        let ParsedBatch {
            records,
            skipped,
            lines_read,
        } = batch;

        tracing::info!(
            "Parsed {} lines: {} accepted, {} skipped",
            lines_read,
            records.len(),
            skipped.len()
        );
        for line in &skipped {
            tracing::debug!("Skipped line {}: {}", line.line_number, line.reason);
        }

        if records.is_empty() {
            return Ok(IngestSummary {
                persisted: Vec::new(),
                skipped,
                lines_read,
            });
        }

        checkpoint(cancel)?;
        let expected = records.len();
        tracing::debug!("Appending {} records to the scorer store", expected);
        let persisted = self.store.append_batch(records).await?;
        if persisted.len() != expected {
            tracing::warn!(
                "Scorer store confirmed {} of {} appended records",
                persisted.len(),
                expected
            );
        }

        Ok(IngestSummary {
            persisted,
            skipped,
            lines_read,
        })
    }
}

/// Line-by-line state shared by the text and stream paths. The first line is the header.
struct BatchCollector<'a> {
    parser: &'a RecordParser,
    row_policy: MalformedRowPolicy,
    batch: ParsedBatch,
}

impl<'a> BatchCollector<'a> {
    fn new(parser: &'a RecordParser, row_policy: MalformedRowPolicy) -> Self {
        Self {
            parser,
            row_policy,
            batch: ParsedBatch::default(),
        }
    }

    fn push(&mut self, line: &str) -> Result<()> {
        self.batch.lines_read += 1;
        let line_number = self.batch.lines_read;
        if line_number == 1 {
            return Ok(());
        }

        match self.parser.parse_line(line) {
            ParseOutcome::Accepted(record) => self.batch.records.push(record),
            ParseOutcome::Skipped(reason) => match self.row_policy {
                MalformedRowPolicy::Skip => {
                    self.batch.skipped.push(SkippedLine {
                        line_number,
                        reason,
                    });
                }
                MalformedRowPolicy::Fail => {
                    return Err(ScorerError::MalformedRow {
                        line: line_number,
                        reason: reason.to_string(),
                    });
                }
            },
        }
        Ok(())
    }

    fn finish(self) -> ParsedBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::model::{ScorerRecord, SkipReason, StoredScorer};
    use crate::domain::policy::ScorePolicy;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingStore {
        inner: MemoryStore,
        appends: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn append_calls(&self) -> usize {
            self.appends.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScorerStore for CountingStore {
        async fn append_batch(&self, records: Vec<ScorerRecord>) -> Result<Vec<StoredScorer>> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            self.inner.append_batch(records).await
        }

        async fn get_all(&self) -> Result<Vec<StoredScorer>> {
            self.inner.get_all().await
        }
    }

    fn ingestor<S: ScorerStore>(store: S) -> BatchIngestor<S> {
        BatchIngestor::new(store, RecordParser::default(), MalformedRowPolicy::Skip)
    }

    #[test]
    fn test_split_on_real_and_escaped_line_breaks() {
        let lines: Vec<&str> =
            split_logical_lines("h\r\nA,B,1\nC,D,2\\r\\nE,F,3").collect();

        assert_eq!(lines, vec!["h", "A,B,1", "C,D,2", "E,F,3"]);
    }

    #[test]
    fn test_parse_text_discards_header_and_keeps_order() {
        let ingestor = ingestor(MemoryStore::new());
        let batch = ingestor
            .parse_text("FirstName,SecondName,Score\\r\\nBrown,Njemza,10\\r\\nLiso,Mbiza,20")
            .unwrap();

        assert_eq!(
            batch.records,
            vec![
                ScorerRecord::new("Brown", "Njemza", 10),
                ScorerRecord::new("Liso", "Mbiza", 20),
            ]
        );
        assert_eq!(batch.lines_read, 3);
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn test_header_is_discarded_even_when_it_looks_like_data() {
        let ingestor = ingestor(MemoryStore::new());
        let batch = ingestor.parse_text("A,B,1\nC,D,2").unwrap();

        assert_eq!(batch.records, vec![ScorerRecord::new("C", "D", 2)]);
    }

    #[test]
    fn test_malformed_lines_do_not_affect_later_lines() {
        let ingestor = ingestor(MemoryStore::new());
        let batch = ingestor
            .parse_text("header\nA,B,1\nbroken line\nC,D\n\nE,F,3,4\nG,H,7\n")
            .unwrap();

        assert_eq!(
            batch.records,
            vec![ScorerRecord::new("A", "B", 1), ScorerRecord::new("G", "H", 7)]
        );
        let skipped_lines: Vec<usize> = batch.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(skipped_lines, vec![3, 4, 5, 6]);
        assert_eq!(
            batch.skipped[1].reason,
            SkipReason::FieldCount { found: 2 }
        );
    }

    #[test]
    fn test_fail_policy_reports_first_malformed_line() {
        let ingestor = BatchIngestor::new(
            MemoryStore::new(),
            RecordParser::default(),
            MalformedRowPolicy::Fail,
        );
        let err = ingestor.parse_text("header\nA,B,1\nC,D\n").unwrap_err();

        match err {
            ScorerError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "expected 3 fields, found 2");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reject_row_score_policy_skips_line() {
        let ingestor = BatchIngestor::new(
            MemoryStore::new(),
            RecordParser::new(',', ScorePolicy::RejectRow),
            MalformedRowPolicy::Skip,
        );
        let batch = ingestor.parse_text("header\nA,B,x\nC,D,4").unwrap();

        assert_eq!(batch.records, vec![ScorerRecord::new("C", "D", 4)]);
        assert_eq!(
            batch.skipped[0].reason,
            SkipReason::InvalidScore {
                value: "x".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_parse_stream_matches_text_path() {
        let ingestor = ingestor(MemoryStore::new());
        let input = "FirstName,SecondName,Score\r\n Brown ,Njemza,10\r\nLiso,Mbiza,20\r\n";
        let cancel = CancellationToken::new();

        let from_stream = ingestor.parse_stream(input.as_bytes(), &cancel).await.unwrap();
        let from_text = ingestor.parse_text(input).unwrap();

        assert_eq!(from_stream, from_text);
        assert_eq!(from_stream.records[0].first_name, "Brown");
    }

    #[tokio::test]
    async fn test_parse_stream_keeps_rows_with_invalid_utf8() {
        let ingestor = ingestor(MemoryStore::new());
        let cancel = CancellationToken::new();
        let input: &[u8] = b"h\r\nAmy,Pond,12\r\nJos\xE9,Lee,30\r\nRory,Williams,40";

        let batch = ingestor.parse_stream(input, &cancel).await.unwrap();

        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.records[1].first_name, "Jos\u{FFFD}");
        assert_eq!(batch.records[1].score, 30);
        assert_eq!(batch.records[2], ScorerRecord::new("Rory", "Williams", 40));
    }

    #[tokio::test]
    async fn test_ingest_text_appends_once_and_returns_store_confirmation() {
        let store = CountingStore::default();
        let ingestor = ingestor(store.clone());
        let cancel = CancellationToken::new();

        let summary = ingestor
            .ingest_text("h\nA,B,1\nC,D,2", &cancel)
            .await
            .unwrap();

        assert_eq!(summary.persisted.len(), 2);
        assert_eq!(summary.persisted[0].id, 1);
        assert_eq!(summary.persisted[1].id, 2);
        assert_eq!(store.append_calls(), 1);
    }

    #[tokio::test]
    async fn test_header_only_input_is_not_an_error() {
        let store = CountingStore::default();
        let ingestor = ingestor(store.clone());
        let cancel = CancellationToken::new();

        let summary = ingestor
            .ingest_text("FirstName,SecondName,Score", &cancel)
            .await
            .unwrap();

        assert!(summary.persisted.is_empty());
        assert_eq!(store.append_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_ingest_never_reaches_store() {
        let store = CountingStore::default();
        let ingestor = ingestor(store.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = ingestor.ingest_text("h\nA,B,1", &cancel).await;

        assert!(matches!(result, Err(ScorerError::Cancelled)));
        assert_eq!(store.append_calls(), 0);
    }
}
