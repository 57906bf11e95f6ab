use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {endpoint}")]
    ApiStatusError { endpoint: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("Lookup failed: {message}")]
    LookupError { message: String },

    #[error("Submission failed: {message}")]
    SubmissionError { message: String },
}

/// 錯誤分類，對應 UI 的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// dependent data could not be fetched; shown as a dismissible banner
    Lookup,
    /// a guarded action was not available
    Validation,
    /// the terminal wizard action was rejected; state kept for retry
    Submission,
    Configuration,
    Transport,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ApiError(_)
            | CatalogError::ApiStatusError { .. }
            | CatalogError::IoError(_)
            | CatalogError::SerializationError(_) => ErrorCategory::Transport,
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CatalogError::ValidationError { .. } | CatalogError::NotFound { .. } => {
                ErrorCategory::Validation
            }
            CatalogError::LookupError { .. } => ErrorCategory::Lookup,
            CatalogError::SubmissionError { .. } => ErrorCategory::Submission,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        CatalogError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Could not reach the catalog API: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
