//! Access guard for the protected namespace.
//!
//! Flow Overview: read the bearer token (presented), read the token cookie
//! (expected), then run the configured checks in order. The first rejection
//! short-circuits the request with `401`; the handler never runs. On admission
//! the verified [`Claims`] are attached to the request extensions.

use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{
    error::AuthError,
    state::AuthState,
    token::{Claims, TokenError, TokenIssuer},
    transport::CookieTransport,
    utils::{extract_bearer_token, now_unix_seconds},
};

#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("missing bearer token")]
    MissingBearer,
    #[error("missing token cookie")]
    MissingCookie,
    #[error("bearer token does not match token cookie")]
    ChannelMismatch,
    #[error("token rejected: {0}")]
    InvalidToken(TokenError),
    #[error("token expired")]
    Expired,
    #[error("expiry checked before signature")]
    Unverified,
}

/// One step of the guard. Checks run in list order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardCheck {
    /// Bearer value equals the token cookie, byte for byte.
    ChannelMatch,
    /// Token signature verifies under the process key.
    SignatureValid,
    /// `now < exp`. Needs claims from [`GuardCheck::SignatureValid`].
    NotExpired,
}

/// Values a single request presents to the guard.
#[derive(Debug)]
pub struct Inspection {
    presented: Option<String>,
    expected: Option<String>,
    claims: Option<Claims>,
    now: i64,
}

impl Inspection {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, now: i64) -> Self {
        Self {
            presented: extract_bearer_token(headers),
            expected: CookieTransport::retrieve(headers),
            claims: None,
            now,
        }
    }
}

impl GuardCheck {
    fn apply(self, issuer: &TokenIssuer, inspection: &mut Inspection) -> Result<(), RejectReason> {
        match self {
            Self::ChannelMatch => {
                let presented = inspection
                    .presented
                    .as_deref()
                    .ok_or(RejectReason::MissingBearer)?;
                let expected = inspection
                    .expected
                    .as_deref()
                    .ok_or(RejectReason::MissingCookie)?;
                if presented == expected {
                    Ok(())
                } else {
                    Err(RejectReason::ChannelMismatch)
                }
            }
            Self::SignatureValid => {
                let presented = inspection
                    .presented
                    .as_deref()
                    .ok_or(RejectReason::MissingBearer)?;
                let claims = issuer.decode(presented).map_err(RejectReason::InvalidToken)?;
                inspection.claims = Some(claims);
                Ok(())
            }
            Self::NotExpired => match &inspection.claims {
                Some(claims) if claims.is_expired(inspection.now) => Err(RejectReason::Expired),
                Some(_) => Ok(()),
                None => Err(RejectReason::Unverified),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Admitted; carries claims when a signature check ran.
    Admit(Option<Claims>),
    Reject,
}

#[derive(Clone, Debug)]
pub struct AccessGuard {
    checks: Vec<GuardCheck>,
}

impl AccessGuard {
    #[must_use]
    pub fn new(checks: Vec<GuardCheck>) -> Self {
        Self { checks }
    }

    /// Channel match, then signature, then expiry.
    #[must_use]
    pub fn hardened() -> Self {
        Self::new(vec![
            GuardCheck::ChannelMatch,
            GuardCheck::SignatureValid,
            GuardCheck::NotExpired,
        ])
    }

    /// Channel match only: an equal cookie and bearer value is enough.
    #[must_use]
    pub fn channel_only() -> Self {
        Self::new(vec![GuardCheck::ChannelMatch])
    }

    #[must_use]
    pub fn checks(&self) -> &[GuardCheck] {
        &self.checks
    }

    /// Run every check in order against one request.
    ///
    /// # Errors
    /// Returns the reason of the first failing check.
    pub fn evaluate(
        &self,
        issuer: &TokenIssuer,
        mut inspection: Inspection,
    ) -> Result<Option<Claims>, RejectReason> {
        // An empty list admits nothing.
        if self.checks.is_empty() {
            return Err(RejectReason::MissingBearer);
        }
        for check in &self.checks {
            check.apply(issuer, &mut inspection)?;
        }
        Ok(inspection.claims)
    }

    /// Decide for one request; reasons are logged, never returned.
    #[must_use]
    pub fn decide(&self, issuer: &TokenIssuer, headers: &HeaderMap, now: i64) -> Decision {
        match self.evaluate(issuer, Inspection::from_headers(headers, now)) {
            Ok(claims) => Decision::Admit(claims),
            Err(reason) => {
                debug!("Access rejected: {reason}");
                Decision::Reject
            }
        }
    }
}

/// Middleware gating the protected prefix. Requests outside it pass through.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn access_guard(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !auth_state.config().is_protected(request.uri().path()) {
        return next.run(request).await;
    }

    match auth_state
        .guard()
        .decide(auth_state.issuer(), request.headers(), now_unix_seconds())
    {
        Decision::Admit(claims) => {
            if let Some(claims) = claims {
                debug!(email = %claims.email, "Access admitted");
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        Decision::Reject => AuthError::Unauthorized.into_response(),
    }
}
