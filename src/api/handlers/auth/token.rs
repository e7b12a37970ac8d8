//! Token issuance and verification.
//!
//! Tokens are compact HS256 JWS values over [`Claims`]. Signing is deterministic:
//! the same identity and instant produce the same token, and any change to a
//! claim field changes the signature.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::state::ConfigError;

/// Claims embedded in every issued token.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated identity.
    pub email: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub const fn is_expired(&self, now_unix_seconds: i64) -> bool {
        now_unix_seconds >= self.exp
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("unsupported algorithm")]
    UnsupportedAlg,
    #[error("token expired")]
    Expired,
    #[error("failed to encode token: {0}")]
    Encode(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Self::UnsupportedAlg,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::TokenFormat,
        }
    }
}

/// Process-wide signing secret. Never empty.
pub struct SigningKey(SecretString);

impl SigningKey {
    /// Wrap a configured secret.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSecret`] for empty or whitespace-only input.
    pub fn new(secret: SecretString) -> Result<Self, ConfigError> {
        if secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self(secret))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(key: &SigningKey, ttl_seconds: i64) -> Self {
        let secret = key.0.expose_secret().as_bytes();

        // Expiry is checked separately so the guard can report it as its own step.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Build claims for `identity` expiring `ttl` seconds after `now` and sign them.
    ///
    /// # Errors
    /// Returns [`TokenError::Encode`] if serialization or signing fails.
    pub fn issue(&self, identity: &str, now_unix_seconds: i64) -> Result<(Claims, String), TokenError> {
        let claims = Claims {
            email: identity.to_string(),
            exp: now_unix_seconds.saturating_add(self.ttl_seconds),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Encode(err.to_string()))?;
        Ok((claims, token))
    }

    /// Check the signature and return the embedded claims. Expiry is not checked.
    ///
    /// # Errors
    /// Returns an error for malformed tokens, foreign algorithms or bad signatures.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }

    /// Check signature and expiry.
    ///
    /// # Errors
    /// Same as [`Self::decode`], plus [`TokenError::Expired`] once `now >= exp`.
    pub fn verify(&self, token: &str, now_unix_seconds: i64) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.is_expired(now_unix_seconds) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &"HS256")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
