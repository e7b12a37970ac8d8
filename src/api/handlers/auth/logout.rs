use axum::{
    extract::Extension,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::{error::AuthError, state::AuthState};

/// Expire the `token` cookie. Issued tokens stay valid until their `exp`.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Token cookie cleared"),
        (status = 500, description = "Failed to build cookie", body = super::error::ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    match auth_state.transport().clear() {
        Ok(cookie) => (StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response(),
        Err(err) => {
            error!("Failed to build logout cookie: {err}");
            AuthError::Internal.into_response()
        }
    }
}
