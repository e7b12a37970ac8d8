//! Error taxonomy for the login and guard paths.
//!
//! Every variant is mapped to a response at the handler boundary; nothing here
//! escapes past the request layer.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// One failed input constraint, reported back to the caller.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// JSON body for every error response.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed body or a field failing its format rule.
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// Well-formed credentials that the store did not accept.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Protected request without a matching, valid token.
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error")]
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                let message = errors
                    .first()
                    .map_or_else(|| "Invalid request".to_string(), |e| e.message.clone());
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse { message, errors }),
                )
                    .into_response()
            }
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    message: INVALID_CREDENTIALS.to_string(),
                    errors: Vec::new(),
                }),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
                Json(ErrorResponse {
                    message: "Unauthorized".to_string(),
                    errors: Vec::new(),
                }),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: Vec::new(),
                }),
            )
                .into_response(),
        }
    }
}
