use crate::{
    api::{self, AuthConfig, AuthState, CredentialStore, SigningKey, StaticCredentialStore},
    cli::telemetry,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub secret: SecretString,
    pub token_ttl_seconds: i64,
    pub login_email: Option<String>,
    pub login_password: SecretString,
    pub public_url: Option<Url>,
    pub protected_prefix: String,
}

/// Build the shared auth state from startup arguments.
///
/// # Errors
/// Returns an error if the secret is blank or the auth configuration is invalid.
pub fn auth_state(args: Args) -> Result<Arc<AuthState>> {
    let key = SigningKey::new(args.secret).context("Invalid signing secret")?;

    let store: Arc<dyn CredentialStore> = Arc::new(StaticCredentialStore::new(
        args.login_email,
        &args.login_password,
    ));

    let config = AuthConfig::new()
        .with_token_ttl_seconds(args.token_ttl_seconds)
        .with_protected_prefix(args.protected_prefix)
        .with_public_url(args.public_url);

    let state = AuthState::new(config, &key, store).context("Invalid auth configuration")?;

    Ok(Arc::new(state))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let port = args.port;
    let state = auth_state(args)?;

    let result = api::new(port, state).await;

    telemetry::shutdown_tracer();

    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("token_ttl_seconds", args.token_ttl_seconds.to_string()),
        ("protected_prefix", args.protected_prefix.clone()),
        (
            "login_email",
            args.login_email
                .clone()
                .unwrap_or_else(|| "any".to_string()),
        ),
        (
            "public_url",
            args.public_url
                .as_ref()
                .map_or_else(|| "none".to_string(), ToString::to_string),
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
