//! Error handling for the consultation SDK
//!
//! This module provides the error system shared by every component:
//! - Classifies failures into the widget-facing taxonomy (`ErrorKind`)
//! - Adds context to errors for debugging (service, endpoint, status)
//! - Maps errors to the localized messages shown to the user
//! - Provides a convenient Result type alias

use std::fmt;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::ErrorMessages;

pub mod mapping;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The query was empty after trimming
    #[error("Query is empty")]
    QueryEmpty,

    /// The query was shorter than the minimum length after trimming
    #[error("Query too short: {actual} characters, at least {min} required")]
    QueryTooShort { min: usize, actual: usize },

    /// Offline environment or transport-level connection failure
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within its deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The upstream body matched none of the accepted shapes
    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// A rating was submitted without choosing positive or negative
    #[error("Rating required")]
    RatingRequired,

    /// A sink is not configured (disabled or unset URL)
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A sink answered 2xx but did not acknowledge the submission
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Serialization or deserialization errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Local durable storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unexpected or internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Errors with additional context
    #[error("{inner}")]
    WithContext {
        inner: Box<ServiceError>,
        context: ErrorContext,
    },
}

/// The error taxonomy surfaced to the widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    QueryTooShort,
    QueryEmpty,
    NetworkError,
    TimeoutError,
    InvalidResponseShape,
    HttpError,
    RatingRequired,
    ConfigurationMissing,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::QueryTooShort => "QueryTooShort",
            ErrorKind::QueryEmpty => "QueryEmpty",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::TimeoutError => "TimeoutError",
            ErrorKind::InvalidResponseShape => "InvalidResponseShape",
            ErrorKind::HttpError => "HttpError",
            ErrorKind::RatingRequired => "RatingRequired",
            ErrorKind::ConfigurationMissing => "ConfigurationMissing",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

impl ServiceError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ServiceError::Network(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        ServiceError::Timeout(message.into())
    }

    /// Create an invalid response shape error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ServiceError::InvalidResponseShape(message.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16, reason: impl Into<String>) -> Self {
        ServiceError::Http {
            status,
            reason: reason.into(),
        }
    }

    /// Create a missing configuration error
    pub fn configuration_missing(message: impl Into<String>) -> Self {
        ServiceError::ConfigurationMissing(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        ServiceError::Rejected(message.into())
    }

    /// Create a parsing error
    pub fn parsing(message: impl Into<String>) -> Self {
        ServiceError::Parsing(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        ServiceError::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(message.into())
    }

    /// Add context to an existing error
    pub fn with_context(self, context: ErrorContext) -> Self {
        ServiceError::WithContext {
            inner: Box::new(self),
            context,
        }
    }

    /// Add a single context key/value to an existing error
    pub fn with_context_value(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let mut context = ErrorContext::new();
        context.add(key, value);
        self.with_context(context)
    }

    /// The error without any context wrappers
    pub fn root(&self) -> &ServiceError {
        match self {
            ServiceError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Classify this error into the widget taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            ServiceError::QueryEmpty => ErrorKind::QueryEmpty,
            ServiceError::QueryTooShort { .. } => ErrorKind::QueryTooShort,
            ServiceError::Network(_) => ErrorKind::NetworkError,
            ServiceError::Timeout(_) => ErrorKind::TimeoutError,
            ServiceError::InvalidResponseShape(_)
            | ServiceError::Parsing(_)
            | ServiceError::Rejected(_) => ErrorKind::InvalidResponseShape,
            ServiceError::Http { .. } => ErrorKind::HttpError,
            ServiceError::RatingRequired => ErrorKind::RatingRequired,
            ServiceError::ConfigurationMissing(_) | ServiceError::Configuration(_) => {
                ErrorKind::ConfigurationMissing
            }
            ServiceError::Storage(_) | ServiceError::Internal(_) => ErrorKind::Internal,
            ServiceError::WithContext { .. } => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status, .. } => Some(*status),
            ServiceError::WithContext { inner, context } => {
                inner.status_code().or(context.status_code)
            }
            _ => None,
        }
    }

    /// Get the context attached to this error, if any
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ServiceError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Validation errors are shown to the user and never reach the network
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::QueryEmpty | ErrorKind::QueryTooShort | ErrorKind::RatingRequired
        )
    }

    /// The localized message to display for this error
    pub fn user_message<'a>(&self, messages: &'a ErrorMessages) -> &'a str {
        match self.kind() {
            ErrorKind::QueryEmpty => &messages.query_empty,
            ErrorKind::QueryTooShort => &messages.query_too_short,
            ErrorKind::NetworkError => &messages.network_error,
            ErrorKind::TimeoutError => &messages.timeout_error,
            ErrorKind::InvalidResponseShape => &messages.invalid_response,
            ErrorKind::RatingRequired => &messages.rating_required,
            ErrorKind::HttpError | ErrorKind::ConfigurationMissing | ErrorKind::Internal => {
                &messages.server_error
            }
        }
    }
}

/// Error context information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Service that generated the error
    pub service: String,

    /// When the error was recorded
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// HTTP status code if applicable
    pub status_code: Option<u16>,

    /// Request ID for tracing
    pub request_id: Option<String>,

    /// Endpoint that was called
    pub endpoint: Option<String>,

    /// Additional context data
    pub data: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            service: "unknown".to_string(),
            timestamp: Some(chrono::Utc::now()),
            status_code: None,
            request_id: None,
            endpoint: None,
            data: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new error context for a specific service
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    /// Add an HTTP status code
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Add a request ID
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Add an endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a context value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.data.insert(key.into(), value.to_string());
    }

    /// Add a context value and return self (builder pattern)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.add(key, value);
        self
    }
}

/// Convert reqwest errors to ServiceError
///
/// Anything that is not a deadline, a decode failure or a status error is a
/// transport failure and becomes `Network`, whatever reqwest called it.
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let mut context = ErrorContext::for_service("http_client");
        if let Some(url) = err.url() {
            context = context.endpoint(url.as_str());
        }

        let service_error = if err.is_timeout() {
            ServiceError::timeout(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            ServiceError::invalid_response(format!("Response decode error: {}", err))
        } else if let Some(status) = err.status() {
            ServiceError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            )
        } else {
            ServiceError::network(format!("Connection error: {}", err))
        };

        match err.status() {
            Some(status) => service_error.with_context(context.status_code(status.as_u16())),
            None => service_error.with_context(context),
        }
    }
}

/// Convert serde_json errors to ServiceError
impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::parsing(format!("JSON error: {}", err))
            .with_context(ErrorContext::for_service("json"))
    }
}
