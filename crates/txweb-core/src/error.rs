//! Error types for txweb-core
//!
//! Failures of the service client carry enough detail for the log, but the
//! shell reduces all of them to one fixed message per operation before
//! anything reaches the page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Connection refused, DNS failure, reset, timeout
    NetworkError,
    /// Backend answered with a non-2xx status
    HttpError,
    /// Backend answered 2xx with a body we could not decode
    InvalidResponse,
    /// Identifier not present in the current snapshot
    TransactionNotFound,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NetworkError => write!(f, "NETWORK_ERROR"),
            ErrorCode::HttpError => write!(f, "HTTP_ERROR"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
        }
    }
}

/// Detailed error information, written to the log by [`log_error`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation failed, user may retry
    Warning,
    /// Error - something is misconfigured or broken
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for txweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Network { .. } => ErrorCode::NetworkError,
            CoreError::HttpStatus { .. } => ErrorCode::HttpError,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Network { .. } => ErrorSeverity::Warning,
            CoreError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Error,
            CoreError::HttpStatus { .. } => ErrorSeverity::Warning,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Network { .. } => {
                details = details.with_suggestion(
                    "Check that the backend is running and backend.base_url is correct.".to_string()
                );
            }
            CoreError::HttpStatus { status, url } => {
                details = details.with_detail(serde_json::json!({ "status": status, "url": url }));
                if *status == 400 {
                    details = details.with_suggestion(
                        "The backend rejected the payload; review the submitted fields.".to_string()
                    );
                } else if *status == 404 {
                    details = details.with_suggestion(
                        "The record may have been deleted; reload the list.".to_string()
                    );
                }
            }
            CoreError::InvalidResponse { message } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
                details = details.with_suggestion(
                    "Check that backend.base_url points at the transaction resource.".to_string()
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/transactions endpoint to list the current snapshot.".to_string()
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            CoreError::HttpStatus {
                status: status.as_u16(),
                url: error.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if error.is_decode() {
            CoreError::InvalidResponse { message: error.to_string() }
        } else {
            CoreError::Network { message: error.to_string() }
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Transaction identifier involved, if any
    pub transaction_id: Option<i64>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            transaction_id: None,
        }
    }

    /// Add the transaction identifier
    pub fn with_transaction_id(mut self, id: i64) -> Self {
        self.transaction_id = Some(id);
        self
    }
}

/// Log a failure at the level its severity calls for
pub fn log_error(error: &CoreError, context: &ErrorContext) {
    let level = match error.severity() {
        ErrorSeverity::Info => log::Level::Info,
        ErrorSeverity::Warning => log::Level::Warn,
        ErrorSeverity::Error => log::Level::Error,
    };
    log::log!(
        target: "txweb::error",
        level,
        "{} - Operation: {} - Transaction: {:?}",
        error.to_details(),
        context.operation,
        context.transaction_id
    );
}

// ==================== Tests ====================
