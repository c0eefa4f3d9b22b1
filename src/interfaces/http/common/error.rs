//! JSON error body shared by every endpoint
//!
//! Shape: `{status, timestamp, message, debugMessage, subErrors[]}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{DomainError, FieldViolation};
use crate::shared::Locale;

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubError {
    pub object: String,
    pub field: String,
    #[schema(value_type = Object)]
    pub rejected_value: serde_json::Value,
    /// Locale-independent constraint code (`NotNull`, `Size`, `Email`, `Past`)
    pub code: String,
    /// Message in the request locale
    pub message: String,
}

impl ApiSubError {
    pub fn from_violation(v: FieldViolation, locale: Locale) -> Self {
        Self {
            object: "user".to_string(),
            message: locale.message(&v.constraint),
            code: v.constraint.code().to_string(),
            field: v.field,
            rejected_value: v.rejected_value,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Status name, e.g. `BAD_REQUEST`
    pub status: String,
    /// `dd-MM-yyyy HH:mm:ss`, UTC
    pub timestamp: String,
    pub message: String,
    pub debug_message: Option<String>,
    pub sub_errors: Vec<ApiSubError>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace([' ', '-'], "_")
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, debug: Option<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                status: status_name(status),
                timestamp: Utc::now().format("%d-%m-%Y %H:%M:%S").to_string(),
                message: message.into(),
                debug_message: debug,
                sub_errors: Vec::new(),
            },
        }
    }

    /// Request parameter or path segment that could not be parsed.
    pub fn malformed(debug: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Malformed request", Some(debug.into()))
    }

    pub fn from_domain(err: DomainError, locale: Locale) -> Self {
        match err {
            DomainError::Validation(violations) => {
                let mut api = Self::new(StatusCode::BAD_REQUEST, "Validation error", None);
                api.body.sub_errors = violations
                    .into_iter()
                    .map(|v| ApiSubError::from_violation(v, locale))
                    .collect();
                api
            }
            DomainError::MalformedInput(msg) => Self::malformed(msg),
            DomainError::NotFound {
                entity,
                field,
                value,
            } => Self::new(
                StatusCode::NOT_FOUND,
                format!("{} was not found for parameters {{{}={}}}", entity, field, value),
                None,
            ),
            DomainError::Conflict(msg) => {
                warn!(reason = %msg, "Unique constraint rejected write");
                Self::new(StatusCode::CONFLICT, "Database error", Some(msg))
            }
            DomainError::Storage(msg) => {
                error!(error = %msg, "Storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error", Some(msg))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ApiErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
