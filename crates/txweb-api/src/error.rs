//! Error types for txweb-api

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use txweb_core::CoreError;
use txweb_utils::escape_html;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Backend unavailable: {message}")]
    BadGateway { message: String },
}

impl ApiError {
    /// Get the HTTP status
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::TransactionNotFound { id } => ApiError::NotFound {
                resource: format!("transaction {}", id),
            },
            error @ (CoreError::Network { .. }
            | CoreError::HttpStatus { .. }
            | CoreError::InvalidResponse { .. }) => ApiError::BadGateway {
                message: error.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }
        let body = format!(
            "<div class='p-4 rounded-lg bg-red-50 text-red-700 border border-red-200'>{}</div>",
            escape_html(&self.to_string())
        );
        (status, Html(body)).into_response()
    }
}

// ==================== Tests ====================
