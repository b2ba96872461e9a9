use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed upstream payload: {message}")]
    MalformedPayload { message: String },

    #[error("Missing query parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid proxy URL '{value}': {reason}")]
    InvalidProxyUrl { value: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Client,
    Config,
    Io,
}

impl StockError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StockError::ApiError(_)
            | StockError::UpstreamStatus { .. }
            | StockError::SerializationError(_)
            | StockError::MalformedPayload { .. } => ErrorCategory::Upstream,
            StockError::MissingParameter { .. } | StockError::InvalidProxyUrl { .. } => {
                ErrorCategory::Client
            }
            StockError::ConfigValidationError { .. }
            | StockError::InvalidConfigValueError { .. }
            | StockError::MissingConfigError { .. } => ErrorCategory::Config,
            StockError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// Short hint printed next to startup failures.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Upstream => "Check that the stock endpoint is reachable and returns JSON",
            ErrorCategory::Client => "Pass an absolute http(s) URL in the `url` query parameter",
            ErrorCategory::Config => "Review the command line flags or the TOML config file",
            ErrorCategory::Io => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, StockError>;
