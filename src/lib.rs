pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{AnyStore, MemoryStore, SqliteStore};
pub use config::{toml_config::TomlConfig, ServerSettings};
pub use crate::core::{parser::RecordParser, service::ScorerService};
pub use domain::model::{ScorerRecord, StoredScorer, TopScorers};
pub use domain::policy::{MalformedRowPolicy, ScorePolicy};
pub use utils::error::{Result, ScorerError};
