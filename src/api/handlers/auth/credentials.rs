//! Credential verification.
//!
//! Input shape is checked before anything here runs; this module only answers
//! "does the backing store accept this identity/secret pair".

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::utils::{constant_time_eq, hash_secret, normalize_email};

/// Backing authentication store.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, identity: &str, secret: &str) -> bool;
}

/// Store with a single registered secret.
///
/// When `identity` is `None` any well-formed identity is accepted with the
/// registered secret.
pub struct StaticCredentialStore {
    identity: Option<String>,
    secret_digest: Vec<u8>,
}

impl StaticCredentialStore {
    #[must_use]
    pub fn new(identity: Option<String>, secret: &SecretString) -> Self {
        Self {
            identity: identity.as_deref().map(normalize_email),
            secret_digest: hash_secret(secret.expose_secret()),
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn verify(&self, identity: &str, secret: &str) -> bool {
        // Always hash so unknown identities cost the same as wrong secrets.
        let secret_matches = constant_time_eq(&hash_secret(secret), &self.secret_digest);
        let identity_matches = self
            .identity
            .as_ref()
            .is_none_or(|registered| *registered == normalize_email(identity));
        secret_matches && identity_matches
    }
}

impl std::fmt::Debug for StaticCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialStore")
            .field("identity", &self.identity)
            .field("secret_digest", &"***")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn CredentialStore>,
}

impl CredentialValidator {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn validate(&self, identity: &str, secret: &str) -> Verdict {
        if self.store.verify(identity, secret) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl std::fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialValidator").finish_non_exhaustive()
    }
}
