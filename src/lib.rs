//! # Tessera (Token Gateway)
//!
//! `tessera` accepts credentials, issues a short-lived signed token and gates a
//! namespace of protected routes behind that token.
//!
//! ## Token Lifecycle
//!
//! 1. `POST /login` checks the request shape (email format, password complexity)
//!    and then asks the configured [`api::CredentialStore`] whether the secret is
//!    accepted. Rejections never reveal which field was wrong.
//! 2. On success an HS256 token is signed over `{ email, exp }`, where
//!    `exp = now + ttl` (3600 seconds unless configured otherwise).
//! 3. The token is returned in the JSON body and written to the `token` cookie.
//!
//! ## Access Guard
//!
//! Every request under the protected prefix (`/index` by default) must present
//! the token as `Authorization: Bearer <token>`. The guard runs an ordered list
//! of checks and rejects with `401` on the first failure:
//!
//! - **Channel match:** the bearer value equals the `token` cookie.
//! - **Signature:** the token was signed with the process secret.
//! - **Expiry:** `now < exp`.
//!
//! ## Signing Secret
//!
//! The secret is read once at startup (`TESSERA_SECRET`). A missing or blank
//! secret aborts startup; there is no fallback key.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
