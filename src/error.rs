use std::path::PathBuf;

use thiserror::Error;

use crate::validator::ErrorDescriptor;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid XML: {0}")]
    InvalidXml(ErrorDescriptor),

    #[error("No XML input provided")]
    EmptyInput,

    #[error("Nothing to export: output is empty")]
    EmptyOutput,

    #[error("Unsupported file type: {path} - expected .xml or .txt")]
    UnsupportedFile { path: PathBuf },

    #[error("AI operation failed: {0}")]
    Ai(#[from] AiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LibXML2 internal error: {details}")]
    LibXml2Internal { details: String },
}

/// Failures of the remote generative-AI collaborator
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API Key is missing")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} - {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("Malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// LibXML2-specific error types
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("Input of {size} bytes exceeds the parser limit")]
    InputTooLarge { size: usize },
}

impl From<ConfigError> for StudioError {
    fn from(err: ConfigError) -> Self {
        StudioError::Config(err.to_string())
    }
}

impl From<LibXml2Error> for StudioError {
    fn from(err: LibXml2Error) -> Self {
        StudioError::LibXml2Internal {
            details: err.to_string(),
        }
    }
}

impl From<ErrorDescriptor> for StudioError {
    fn from(descriptor: ErrorDescriptor) -> Self {
        StudioError::InvalidXml(descriptor)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StudioError>;

/// AI collaborator result type alias
pub type AiResult<T> = std::result::Result<T, AiError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;
