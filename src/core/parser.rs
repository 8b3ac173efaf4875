use crate::domain::model::{ParseOutcome, ScorerRecord, SkipReason};
use crate::domain::policy::ScorePolicy;

pub const DEFAULT_DELIMITER: char = ',';
const FIELD_COUNT: usize = 3;

/// Turns one delimited line into a scorer record, or a reason to skip it.
///
/// Arity is enforced, field emptiness is not: `",,7"` yields a record with
/// empty names. Score handling follows the configured [`ScorePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordParser {
    delimiter: char,
    score_policy: ScorePolicy,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER, ScorePolicy::default())
    }
}

impl RecordParser {
    pub fn new(delimiter: char, score_policy: ScorePolicy) -> Self {
        Self {
            delimiter,
            score_policy,
        }
    }

    pub fn parse_line(&self, line: &str) -> ParseOutcome {
        let fields: Vec<&str> = line.split(self.delimiter).collect();
        if fields.len() != FIELD_COUNT {
            return ParseOutcome::Skipped(SkipReason::FieldCount {
                found: fields.len(),
            });
        }

        let score = match (parse_score(fields[2]), self.score_policy) {
            (Some(score), _) => score,
            (None, ScorePolicy::DefaultToZero) => 0,
            (None, ScorePolicy::RejectRow) => {
                return ParseOutcome::Skipped(SkipReason::InvalidScore {
                    value: fields[2].trim().to_string(),
                })
            }
        };

        ParseOutcome::Accepted(ScorerRecord::new(
            fields[0].trim(),
            fields[1].trim(),
            score,
        ))
    }
}

/// Surrounding whitespace and a leading sign are accepted; anything else is not a score.
fn parse_score(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}
