use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Scorer store error: {message}")]
    StoreError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Store,
    Network,
    Configuration,
    Lifecycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScorerError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::NotFound { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Input
            }
            Self::MalformedRow { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Data
            }
            Self::DatabaseError(_) | Self::StoreError { .. } | Self::IoError(_) => {
                ErrorCategory::Store
            }
            Self::ApiError(_) => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Cancelled => ErrorCategory::Lifecycle,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lifecycle => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Store | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Failures raised by the scorer store rather than by the caller's input.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::StoreError { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { message } | Self::NotFound { message } => message.clone(),
            Self::MalformedRow { line, reason } => {
                format!("Line {} could not be parsed ({})", line, reason)
            }
            Self::Cancelled => "The request was cancelled before it completed".to_string(),
            Self::DatabaseError(_) | Self::StoreError { .. } => {
                "The scorer store is currently unavailable".to_string()
            }
            Self::ApiError(e) => format!("Could not reach the scorer service: {}", e),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Send a header line followed by firstName,secondName,score rows",
            Self::MalformedRow { .. } => {
                "Fix the reported line or run without --strict to skip malformed rows"
            }
            Self::NotFound { .. } => "Check the spelling of the first or second name",
            Self::Cancelled => "Retry the request",
            Self::DatabaseError(_) | Self::StoreError { .. } => {
                "Check that the database file is reachable and writable"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::ApiError(_) => "Check that the server is running and the base URL is correct",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the command line flags or the TOML file",
            _ => "See the logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScorerError>;
