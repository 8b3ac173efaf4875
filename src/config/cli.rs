use crate::config::toml_config::TomlConfig;
use crate::config::ServerSettings;
use crate::domain::policy::{MalformedRowPolicy, ScorePolicy};
use crate::utils::error::Result;
use clap::Parser;

/// Command line for the scorer server. Flags given here override the TOML file.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "scorer-etl")]
#[command(about = "Ingest scorer CSV data and serve top-scorer queries over HTTP")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SCORER_CONFIG")]
    pub config: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, env = "SCORER_BIND")]
    pub bind: Option<String>,

    /// SQLite database file; without it records are kept in memory
    #[arg(long, env = "SCORER_DATABASE")]
    pub database: Option<String>,

    #[arg(long, value_enum)]
    pub score_policy: Option<ScorePolicy>,

    /// Fail the whole ingestion on the first malformed line
    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub delimiter: Option<char>,

    /// CSV file ingested once at startup
    #[arg(long)]
    pub seed: Option<String>,

    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<ServerSettings> {
        let base = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.to_settings()?,
            None => ServerSettings::default(),
        };
        Ok(self.apply_overrides(base))
    }

    fn apply_overrides(&self, mut settings: ServerSettings) -> ServerSettings {
        if let Some(bind) = &self.bind {
            settings.bind = bind.clone();
        }
        if let Some(database) = &self.database {
            settings.database_path = Some(database.clone());
        }
        if let Some(policy) = self.score_policy {
            settings.score_policy = policy;
        }
        if self.strict {
            settings.malformed_row_policy = MalformedRowPolicy::Fail;
        }
        if let Some(delimiter) = self.delimiter {
            settings.delimiter = delimiter;
        }
        if let Some(seed) = &self.seed {
            settings.seed_file = Some(seed.clone());
        }
        if let Some(limit) = self.max_upload_bytes {
            settings.max_upload_bytes = limit;
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        }
        if self.json_logs {
            settings.log_json = true;
        }
        settings
    }
}
