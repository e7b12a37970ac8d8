//! Login endpoint.
//!
//! Input shape is validated first, then the credential store is consulted, and
//! only then is a token issued and written to the cookie channel. Any failure
//! returns before the `Set-Cookie` header exists.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    credentials::Verdict,
    error::{AuthError, ErrorResponse, FieldError},
    state::AuthState,
    types::{LoginRequest, LoginResponse},
    utils::now_unix_seconds,
};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued and stored in the `token` cookie", body = LoginResponse),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected login body: {rejection}");
            return AuthError::Validation(vec![FieldError::new("body", rejection.body_text())])
                .into_response();
        }
    };

    match authenticate(&auth_state, &request, now_unix_seconds()) {
        Ok((headers, response)) => (StatusCode::OK, headers, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

type LoginHeaders = [(HeaderName, HeaderValue); 1];

fn authenticate(
    auth_state: &AuthState,
    request: &LoginRequest,
    now: i64,
) -> Result<(LoginHeaders, LoginResponse), AuthError> {
    request.validate()?;

    if auth_state
        .validator()
        .validate(&request.email, &request.password)
        == Verdict::Rejected
    {
        debug!(email = %request.email, "Credentials rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let (claims, token) = auth_state
        .issuer()
        .issue(&request.email, now)
        .map_err(|err| {
            error!("Failed to issue token: {err}");
            AuthError::Internal
        })?;

    let cookie = auth_state.transport().record(&token).map_err(|err| {
        error!("Failed to build token cookie: {err}");
        AuthError::Internal
    })?;

    info!(email = %claims.email, exp = claims.exp, "Login succeeded");

    Ok((
        [(SET_COOKIE, cookie)],
        LoginResponse {
            payload: claims,
            token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::super::{
        credentials::{CredentialStore, StaticCredentialStore},
        state::AuthConfig,
        token::SigningKey,
    };
    use super::*;
    use anyhow::Result;
    use secrecy::SecretString;

    const NOW: i64 = 1_700_000_000;

    fn state() -> Result<AuthState> {
        let key = SigningKey::new(SecretString::from("login-secret"))?;
        let store: Arc<dyn CredentialStore> = Arc::new(StaticCredentialStore::new(
            None,
            &SecretString::from("qwery1234*"),
        ));
        Ok(AuthState::new(AuthConfig::new(), &key, store)?)
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn authenticate_issues_claims_and_cookie() -> Result<()> {
        let state = state()?;
        let ([(name, cookie)], response) =
            authenticate(&state, &request("a@b.com", "qwery1234*"), NOW)?;
        assert_eq!(name, SET_COOKIE);
        assert_eq!(response.payload.email, "a@b.com");
        assert_eq!(response.payload.exp, NOW + 3600);
        assert!(
            cookie
                .to_str()?
                .starts_with(&format!("token={}; ", response.token))
        );
        Ok(())
    }

    #[test]
    fn authenticate_rejects_wrong_password() -> Result<()> {
        let state = state()?;
        let result = authenticate(&state, &request("a@b.com", "wrong1234*"), NOW);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        Ok(())
    }

    #[test]
    fn authenticate_validates_before_credentials() -> Result<()> {
        let state = state()?;
        let result = authenticate(&state, &request("a@b.com", "short"), NOW);
        assert!(matches!(result, Err(AuthError::Validation(_))));
        Ok(())
    }
}
