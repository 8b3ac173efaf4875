use crate::domain::model::StoredScorer;
use serde::{Deserialize, Serialize};

/// Wire shape of a scorer; store identity stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerDto {
    pub first_name: String,
    pub second_name: String,
    pub score: i64,
}

impl From<&StoredScorer> for ScorerDto {
    fn from(stored: &StoredScorer) -> Self {
        Self {
            first_name: stored.record.first_name.clone(),
            second_name: stored.record.second_name.clone(),
            score: stored.record.score,
        }
    }
}

pub fn to_dtos(scorers: &[StoredScorer]) -> Vec<ScorerDto> {
    scorers.iter().map(ScorerDto::from).collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
