//! Small helpers for auth validation.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::Utc;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Symbols a password may (and must at least once) contain.
pub(crate) const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

pub(crate) const PASSWORD_MIN_LEN: usize = 8;

pub(crate) const PASSWORD_RULE: &str =
    "Minimum eight characters, at least one letter, one number and one special character";

/// Basic email format check.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Password complexity: only letters, digits and [`PASSWORD_SYMBOLS`], at least
/// [`PASSWORD_MIN_LEN`] long, with one of each class.
pub(crate) fn valid_password(password: &str) -> bool {
    let charset = Regex::new(r"^[A-Za-z\d@$!%*#?&]{8,}$")
        .is_ok_and(|regex| regex.is_match(password));

    charset
        && password.len() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Normalize an email for comparisons against configured identities.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a secret so comparisons run over fixed-size digests.
pub(crate) fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

/// Compare two byte strings without short-circuiting on the first difference.
pub(crate) fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |acc, (l, r)| acc | (l ^ r))
            == 0
}

pub(crate) fn now_unix_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Read the token from `Authorization: Bearer <token>`.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let (scheme, token) = trimmed.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
