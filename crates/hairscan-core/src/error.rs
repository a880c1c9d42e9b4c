//! Error types for hairscan.

use std::fmt;

use thiserror::Error;

/// Result type alias using hairscan's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hairscan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API key absent or still the placeholder value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure or non-success HTTP status
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The API succeeded but the reply carried no text
    #[error("Empty response from completion API")]
    EmptyResponse,

    /// No JSON object could be recovered from the model reply
    #[error("Could not extract JSON from model reply: {excerpt}")]
    Extraction { excerpt: String },

    /// JSON parsed but a mandatory field is missing or mistyped
    #[error("Schema error in field `{field}`: {reason}")]
    Schema { field: String, reason: String },

    /// Uploaded file rejected before any network activity
    #[error("Invalid image: {0}")]
    Validation(#[from] FileValidationError),

    /// Caller cancelled the analysis between stages
    #[error("Analysis cancelled")]
    Cancelled,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable classification used in log fields and CLI output.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::EmptyResponse => ErrorKind::EmptyResponse,
            Error::Extraction { .. } => ErrorKind::Extraction,
            Error::Schema { .. } => ErrorKind::Schema,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    EmptyResponse,
    Extraction,
    Schema,
    Validation,
    Cancelled,
    Serialization,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::EmptyResponse => "empty_response",
            Self::Extraction => "extraction",
            Self::Schema => "schema",
            Self::Validation => "validation",
            Self::Cancelled => "cancelled",
            Self::Serialization => "serialization",
            Self::Io => "io",
        };
        f.write_str(s)
    }
}

/// Reasons an uploaded image is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileValidationError {
    #[error("unsupported format `{mime_type}`, please upload a JPG or PNG image")]
    UnsupportedFormat { mime_type: String },

    #[error("file too large ({size} bytes), images must not exceed {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("no image selected")]
    NoImage,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        let message = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            e.to_string()
        };
        Error::Transport { status, message }
    }
}
