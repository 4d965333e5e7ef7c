// src/error.rs

//! Unified error handling for the event crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Renderer unreachable, timed out, or returned a non-success status
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Renderer response body was not the expected `{"html": ...}` shape
    #[error("malformed renderer response: {0}")]
    MalformedResponse(String),

    /// Renderer answered but delivered no content
    #[error("renderer returned empty content for {url}")]
    EmptyContent { url: String },

    /// Rendered payload could not be treated as an HTML document
    #[error("document parse error for {url}: {message}")]
    DocumentParse { url: String, message: String },

    /// CSS selector parsing failed
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A single element's field could not be extracted
    #[error("field extraction failed for {field}: {message}")]
    FieldExtraction { field: String, message: String },

    /// All fetch attempts were used up
    #[error("fetch failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// Operation aborted by the caller's cancellation signal
    #[error("operation cancelled")]
    Cancelled,

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a document parse error.
    pub fn document_parse(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::DocumentParse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a field extraction error.
    pub fn field(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::FieldExtraction {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True if this error (or the root cause of exhausted retries)
    /// is a cancellation. The aggregator logs these differently from
    /// ordinary fetch failures.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::RetriesExhausted { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}
