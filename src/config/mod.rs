#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::parser::DEFAULT_DELIMITER;
use crate::domain::policy::{MalformedRowPolicy, ScorePolicy};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_delimiter, validate_path, validate_positive_number, validate_socket_addr, Validate,
};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fully resolved server settings, after the TOML file and command line are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
    pub database_path: Option<String>,
    pub delimiter: char,
    pub score_policy: ScorePolicy,
    pub malformed_row_policy: MalformedRowPolicy,
    pub max_upload_bytes: usize,
    pub seed_file: Option<String>,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database_path: None,
            delimiter: DEFAULT_DELIMITER,
            score_policy: ScorePolicy::default(),
            malformed_row_policy: MalformedRowPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_file: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ConfigProvider for ServerSettings {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn database_path(&self) -> Option<&str> {
        self.database_path.as_deref()
    }

    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn score_policy(&self) -> ScorePolicy {
        self.score_policy
    }

    fn malformed_row_policy(&self) -> MalformedRowPolicy {
        self.malformed_row_policy
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;
        if let Some(path) = &self.database_path {
            validate_path("database", path)?;
        }
        if let Some(seed) = &self.seed_file {
            validate_path("seed", seed)?;
        }
        validate_delimiter("delimiter", self.delimiter)?;
        validate_positive_number("max_upload_bytes", self.max_upload_bytes, 1)?;
        Ok(())
    }
}
