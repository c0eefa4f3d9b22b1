//! JSON body extractor for Axum
//!
//! `JsonBody<T>` works like `axum::Json<T>`, but a body that cannot be
//! parsed (bad syntax, wrong type, bad date) is answered with the standard
//! [`ApiError`] shape instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiError;

/// An extractor that deserializes JSON and reports failures as [`ApiError`].
///
/// ```ignore
/// async fn handler(JsonBody(body): JsonBody<UserRequest>) {
///     // `body` parsed; field rules are checked by the service
/// }
/// ```
pub struct JsonBody<T>(pub T);

/// Error type for `JsonBody` extraction failures.
pub struct JsonBodyRejection(JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let rejection = self.0;
        // axum answers type errors with 422; parse failures of any kind are a 400 here
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::new(
            status,
            "Malformed JSON request",
            Some(rejection.body_text()),
        )
        .into_response()
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;

        Ok(JsonBody(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
