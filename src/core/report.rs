//! Presentation of a computed [`TopScorers`] result. Nothing here touches a store.

use crate::domain::model::TopScorers;
use crate::utils::error::{Result, ScorerError};

const RULE: &str = "=============================================================";

pub fn render_banner(result: &TopScorers) -> String {
    let mut lines = vec![RULE.to_string()];
    match result.max_score {
        Some(score) if !result.is_empty() => {
            for scorer in &result.scorers {
                lines.push(format!(
                    "== {} {}",
                    scorer.record.first_name.trim(),
                    scorer.record.second_name.trim()
                ));
            }
            lines.push(format!("== Score: {}", score));
        }
        _ => lines.push("== No scorers recorded".to_string()),
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn to_csv(result: &TopScorers) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["FirstName", "SecondName", "Score"])?;
    for scorer in &result.scorers {
        writer.write_record([
            scorer.record.first_name.as_str(),
            scorer.record.second_name.as_str(),
            scorer.record.score.to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScorerError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScorerError::ValidationError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ScorerRecord, StoredScorer};
    use chrono::Utc;

    fn stored(id: i64, first: &str, second: &str, score: i64) -> StoredScorer {
        StoredScorer {
            id,
            record: ScorerRecord::new(first, second, score),
            created_at: Utc::now(),
        }
    }

    fn ties() -> TopScorers {
        TopScorers {
            max_score: Some(15),
            scorers: vec![stored(2, "B", "Two", 15), stored(3, "C", "Three", 15)],
        }
    }

    #[test]
    fn test_banner_lists_each_scorer_then_score() {
        let banner = render_banner(&ties());
        let lines: Vec<&str> = banner.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "== B Two");
        assert_eq!(lines[2], "== C Three");
        assert_eq!(lines[3], "== Score: 15");
        assert_eq!(lines[0], lines[4]);
    }

    #[test]
    fn test_banner_for_empty_result() {
        let banner = render_banner(&TopScorers::default());
        assert!(banner.contains("No scorers recorded"));
    }

    #[test]
    fn test_csv_export_quotes_delimiters_in_names() {
        let result = TopScorers {
            max_score: Some(9),
            scorers: vec![stored(1, "Mary, Jr", "Smith", 9)],
        };

        let csv = to_csv(&result).unwrap();

        assert_eq!(csv, "FirstName,SecondName,Score\n\"Mary, Jr\",Smith,9\n");
    }

    #[test]
    fn test_csv_export_of_empty_result_is_header_only() {
        assert_eq!(
            to_csv(&TopScorers::default()).unwrap(),
            "FirstName,SecondName,Score\n"
        );
    }
}
