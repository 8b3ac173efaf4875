use crate::config::{ServerSettings, DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES};
use crate::domain::policy::{MalformedRowPolicy, ScorePolicy};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScorerError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub storage: StorageSection,
    pub ingest: IngestSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    pub delimiter: String,
    pub score_policy: ScorePolicy,
    pub malformed_rows: MalformedRowPolicy,
    pub seed_file: Option<String>,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            score_policy: ScorePolicy::default(),
            malformed_rows: MalformedRowPolicy::default(),
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TomlConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScorerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScorerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn delimiter_char(&self) -> Result<char> {
        let mut chars = self.ingest.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ScorerError::InvalidConfigValueError {
                field: "ingest.delimiter".to_string(),
                value: self.ingest.delimiter.clone(),
                reason: "Delimiter must be exactly one character".to_string(),
            }),
        }
    }

    pub fn to_settings(&self) -> Result<ServerSettings> {
        let database_path = match self.storage.backend {
            StorageBackend::Memory => None,
            StorageBackend::Sqlite => Some(
                crate::utils::validation::validate_required_field(
                    "storage.path",
                    &self.storage.path,
                )?
                .clone(),
            ),
        };

        Ok(ServerSettings {
            bind: self.server.bind.clone(),
            database_path,
            delimiter: self.delimiter_char()?,
            score_policy: self.ingest.score_policy,
            malformed_row_policy: self.ingest.malformed_rows,
            max_upload_bytes: self.server.max_upload_bytes,
            seed_file: self.ingest.seed_file.clone(),
            log_level: self.logging.level.clone(),
            log_json: self.logging.json,
        })
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn database_path(&self) -> Option<&str> {
        match self.storage.backend {
            StorageBackend::Memory => None,
            StorageBackend::Sqlite => self.storage.path.as_deref(),
        }
    }

    fn delimiter(&self) -> char {
        self.delimiter_char()
            .unwrap_or(crate::core::parser::DEFAULT_DELIMITER)
    }

    fn score_policy(&self) -> ScorePolicy {
        self.ingest.score_policy
    }

    fn malformed_row_policy(&self) -> MalformedRowPolicy {
        self.ingest.malformed_rows
    }

    fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_bytes
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings()?.validate()
    }
}
