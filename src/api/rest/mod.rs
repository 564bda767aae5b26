//! REST API module for HTTP endpoints
//!
//! Provides the backup endpoints used by the frontend:
//! - `POST /api/backup` - Save a new backup
//! - `GET /api/backups` - List backups, newest first
//! - `GET /api/backup/latest` - Latest backup (loaded at startup)
//! - `GET /api/backup/:filename` - Specific backup

pub mod backups;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::StoreError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.to_string(),
            status,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::not_found("Backup not found"),
            StoreError::InvalidName(_) => ApiError::bad_request(e.to_string()),
            _ => ApiError::internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "PAYLOAD_TOO_LARGE"
        } else if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            "UNSUPPORTED_MEDIA_TYPE"
        } else if status == StatusCode::UNPROCESSABLE_ENTITY {
            "UNPROCESSABLE_ENTITY"
        } else {
            "BAD_REQUEST"
        };
        ApiError::new(status, rejection.body_text(), code)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, "Backup request failed");
        } else {
            warn!(status = %self.status, error = %self.error, "Backup request rejected");
        }
        (self.status, Json(self)).into_response()
    }
}
