//! Auth state and configuration.

use std::sync::Arc;
use thiserror::Error;
use url::Url;

use super::{
    credentials::{CredentialStore, CredentialValidator},
    guard::AccessGuard,
    token::{SigningKey, TokenIssuer},
    transport::CookieTransport,
};

pub(crate) const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;
pub(crate) const DEFAULT_PROTECTED_PREFIX: &str = "/index";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("signing secret is missing or blank")]
    MissingSecret,
    #[error("token ttl must be positive, got {0}")]
    InvalidTtl(i64),
    #[error("protected prefix must start with '/' and not end with one: {0}")]
    InvalidPrefix(String),
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_ttl_seconds: i64,
    protected_prefix: String,
    public_url: Option<Url>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            protected_prefix: DEFAULT_PROTECTED_PREFIX.to_string(),
            public_url: None,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_protected_prefix(mut self, prefix: String) -> Self {
        self.protected_prefix = prefix;
        self
    }

    #[must_use]
    pub fn with_public_url(mut self, url: Option<Url>) -> Self {
        self.public_url = url;
        self
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn protected_prefix(&self) -> &str {
        &self.protected_prefix
    }

    /// Only mark cookies secure when the service is reached over HTTPS.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.public_url
            .as_ref()
            .is_some_and(|url| url.scheme() == "https")
    }

    /// Whether `path` falls inside the guarded namespace.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        path.strip_prefix(self.protected_prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidTtl(self.token_ttl_seconds));
        }
        let prefix = &self.protected_prefix;
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }
        Ok(())
    }
}

/// Read-only state shared by every request task.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    issuer: TokenIssuer,
    transport: CookieTransport,
    validator: CredentialValidator,
    guard: AccessGuard,
}

impl AuthState {
    /// Build the state from startup configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the configuration is unusable.
    pub fn new(
        config: AuthConfig,
        key: &SigningKey,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let issuer = TokenIssuer::new(key, config.token_ttl_seconds());
        let transport = CookieTransport::new(config.token_ttl_seconds(), config.cookie_secure());
        Ok(Self {
            config,
            issuer,
            transport,
            validator: CredentialValidator::new(store),
            guard: AccessGuard::hardened(),
        })
    }

    /// Replace the guard check list.
    #[must_use]
    pub fn with_guard(mut self, guard: AccessGuard) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn transport(&self) -> &CookieTransport {
        &self.transport
    }

    #[must_use]
    pub fn validator(&self) -> &CredentialValidator {
        &self.validator
    }

    #[must_use]
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::super::credentials::StaticCredentialStore;
    use super::*;
    use anyhow::Result;
    use secrecy::SecretString;

    fn key() -> Result<SigningKey> {
        Ok(SigningKey::new(SecretString::from("test-secret"))?)
    }

    fn store() -> Arc<dyn CredentialStore> {
        Arc::new(StaticCredentialStore::new(
            None,
            &SecretString::from("qwery1234*"),
        ))
    }

    #[test]
    fn auth_config_defaults_and_overrides() -> Result<()> {
        let config = AuthConfig::new();
        assert_eq!(config.token_ttl_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.protected_prefix(), DEFAULT_PROTECTED_PREFIX);
        assert!(!config.cookie_secure());

        let config = config
            .with_token_ttl_seconds(120)
            .with_protected_prefix("/api".to_string())
            .with_public_url(Some(Url::parse("https://gate.example.com")?));
        assert_eq!(config.token_ttl_seconds(), 120);
        assert_eq!(config.protected_prefix(), "/api");
        assert!(config.cookie_secure());
        Ok(())
    }

    #[test]
    fn plain_http_public_url_is_not_secure() -> Result<()> {
        let config =
            AuthConfig::new().with_public_url(Some(Url::parse("http://localhost:8080")?));
        assert!(!config.cookie_secure());
        Ok(())
    }

    #[test]
    fn is_protected_matches_namespace_only() {
        let config = AuthConfig::new();
        assert!(config.is_protected("/index"));
        assert!(config.is_protected("/index/"));
        assert!(config.is_protected("/index/movies"));
        assert!(config.is_protected("/index/a/b"));
        assert!(!config.is_protected("/indexes"));
        assert!(!config.is_protected("/login"));
        assert!(!config.is_protected("/"));
    }

    #[test]
    fn auth_state_rejects_non_positive_ttl() -> Result<()> {
        let result = AuthState::new(AuthConfig::new().with_token_ttl_seconds(0), &key()?, store());
        assert!(matches!(result, Err(ConfigError::InvalidTtl(0))));
        Ok(())
    }

    #[test]
    fn auth_state_rejects_bad_prefix() -> Result<()> {
        for prefix in ["index", "/", "/index/", ""] {
            let config = AuthConfig::new().with_protected_prefix(prefix.to_string());
            let result = AuthState::new(config, &key()?, store());
            assert!(
                matches!(result, Err(ConfigError::InvalidPrefix(_))),
                "{prefix:?} should be rejected"
            );
        }
        Ok(())
    }

    #[test]
    fn auth_state_wires_ttl_into_issuer() -> Result<()> {
        let state = AuthState::new(AuthConfig::new().with_token_ttl_seconds(90), &key()?, store())?;
        assert_eq!(state.issuer().ttl_seconds(), 90);
        let (claims, _) = state.issuer().issue("a@b.com", 10)?;
        assert_eq!(claims.exp, 100);
        Ok(())
    }
}
