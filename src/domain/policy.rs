use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a score field that is not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ScorePolicy {
    #[default]
    DefaultToZero,
    RejectRow,
}

/// What the ingestor does with lines the parser skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum MalformedRowPolicy {
    #[default]
    Skip,
    Fail,
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorePolicy::DefaultToZero => f.write_str("default-to-zero"),
            ScorePolicy::RejectRow => f.write_str("reject-row"),
        }
    }
}

impl fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRowPolicy::Skip => f.write_str("skip"),
            MalformedRowPolicy::Fail => f.write_str("fail"),
        }
    }
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default-to-zero" | "zero" => Ok(ScorePolicy::DefaultToZero),
            "reject-row" | "reject" => Ok(ScorePolicy::RejectRow),
            other => Err(format!("unknown score policy: {}", other)),
        }
    }
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedRowPolicy::Skip),
            "fail" | "strict" => Ok(MalformedRowPolicy::Fail),
            other => Err(format!("unknown malformed row policy: {}", other)),
        }
    }
}
