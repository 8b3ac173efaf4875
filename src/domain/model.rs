use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated `(firstName, secondName, score)` triple produced by parsing one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerRecord {
    pub first_name: String,
    pub second_name: String,
    pub score: i64,
}

impl ScorerRecord {
    pub fn new(first_name: impl Into<String>, second_name: impl Into<String>, score: i64) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            score,
        }
    }

    /// Case-insensitive match against either name field.
    pub fn matches_name(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.first_name.to_lowercase() == needle || self.second_name.to_lowercase() == needle
    }
}

impl AsRef<ScorerRecord> for ScorerRecord {
    fn as_ref(&self) -> &ScorerRecord {
        self
    }
}

/// A record as persisted by a scorer store, with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScorer {
    pub id: i64,
    #[serde(flatten)]
    pub record: ScorerRecord,
    pub created_at: DateTime<Utc>,
}

impl AsRef<ScorerRecord> for StoredScorer {
    fn as_ref(&self) -> &ScorerRecord {
        &self.record
    }
}

/// Records sharing the maximum score of a snapshot. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopScorers {
    pub max_score: Option<i64>,
    pub scorers: Vec<StoredScorer>,
}

impl TopScorers {
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    FieldCount { found: usize },
    InvalidScore { value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCount { found } => write!(f, "expected 3 fields, found {}", found),
            SkipReason::InvalidScore { value } => write!(f, "score '{}' is not an integer", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted(ScorerRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based, counting the header as line 1.
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Records accepted from one input, before they reach the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    pub records: Vec<ScorerRecord>,
    pub skipped: Vec<SkippedLine>,
    pub lines_read: usize,
}

#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub persisted: Vec<StoredScorer>,
    pub skipped: Vec<SkippedLine>,
    pub lines_read: usize,
}
