use anyhow::{Context, bail};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

use crate::api::handlers::auth::{DEFAULT_PROTECTED_PREFIX, DEFAULT_TOKEN_TTL_SECONDS};

pub const ARG_SECRET: &str = "secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_LOGIN_EMAIL: &str = "login-email";
pub const ARG_LOGIN_PASSWORD: &str = "login-password";
pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_PROTECTED_PREFIX: &str = "protected-prefix";

const DEFAULT_LOGIN_PASSWORD: &str = "qwery1234*";

#[derive(Debug, Clone)]
pub struct Options {
    pub secret: SecretString,
    pub token_ttl_seconds: i64,
    pub login_email: Option<String>,
    pub login_password: SecretString,
    pub public_url: Option<Url>,
    pub protected_prefix: String,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing or blank, or the public URL is invalid.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // Env vars set to "" reach us as empty strings.
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let Some(secret) = get_non_empty(ARG_SECRET) else {
            bail!("missing required argument: --{ARG_SECRET}");
        };

        let public_url = get_non_empty(ARG_PUBLIC_URL)
            .map(|url| Url::parse(&url).with_context(|| format!("invalid --{ARG_PUBLIC_URL}: {url}")))
            .transpose()?;

        Ok(Self {
            secret: SecretString::from(secret),
            token_ttl_seconds: matches
                .get_one::<i64>(ARG_TOKEN_TTL_SECONDS)
                .copied()
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
            login_email: get_non_empty(ARG_LOGIN_EMAIL),
            login_password: SecretString::from(
                get_non_empty(ARG_LOGIN_PASSWORD)
                    .unwrap_or_else(|| DEFAULT_LOGIN_PASSWORD.to_string()),
            ),
            public_url,
            protected_prefix: get_non_empty(ARG_PROTECTED_PREFIX)
                .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIX.to_string()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SECRET)
                .long(ARG_SECRET)
                .help("HS256 signing secret for issued tokens")
                .long_help(
                    "HS256 signing secret for issued tokens.\n\nRequired. Startup fails when it is missing or blank; there is no fallback key.",
                )
                .env("TESSERA_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Token lifetime in seconds, also used as the cookie Max-Age")
                .env("TESSERA_TOKEN_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOGIN_EMAIL)
                .long(ARG_LOGIN_EMAIL)
                .help("Only accept this identity at login (any well-formed email when unset)")
                .env("TESSERA_LOGIN_EMAIL"),
        )
        .arg(
            Arg::new(ARG_LOGIN_PASSWORD)
                .long(ARG_LOGIN_PASSWORD)
                .help("Password accepted at login")
                .env("TESSERA_LOGIN_PASSWORD")
                .hide_env_values(true)
                .hide_default_value(true)
                .default_value(DEFAULT_LOGIN_PASSWORD),
        )
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public base URL; https marks the token cookie Secure")
                .env("TESSERA_PUBLIC_URL"),
        )
        .arg(
            Arg::new(ARG_PROTECTED_PREFIX)
                .long(ARG_PROTECTED_PREFIX)
                .help("Path prefix guarded by the bearer token")
                .env("TESSERA_PROTECTED_PREFIX")
                .default_value(DEFAULT_PROTECTED_PREFIX),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("TESSERA_SECRET", None::<&str>),
                ("TESSERA_TOKEN_TTL_SECONDS", None),
                ("TESSERA_LOGIN_EMAIL", None),
                ("TESSERA_LOGIN_PASSWORD", None),
                ("TESSERA_PUBLIC_URL", None),
                ("TESSERA_PROTECTED_PREFIX", None),
            ],
            f,
        )
    }

    fn command() -> Command {
        with_args(Command::new("tessera"))
    }

    #[test]
    fn defaults_apply() -> anyhow::Result<()> {
        clean_env(|| {
            let matches = command().try_get_matches_from(["tessera", "--secret", "s3cret"])?;
            let options = Options::parse(&matches)?;
            assert_eq!(options.secret.expose_secret(), "s3cret");
            assert_eq!(options.token_ttl_seconds, 3600);
            assert_eq!(options.login_email, None);
            assert_eq!(options.login_password.expose_secret(), "qwery1234*");
            assert!(options.public_url.is_none());
            assert_eq!(options.protected_prefix, "/index");
            Ok(())
        })
    }

    #[test]
    fn missing_secret_is_an_error() -> anyhow::Result<()> {
        clean_env(|| {
            let matches = command().try_get_matches_from(["tessera"])?;
            let result = Options::parse(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("missing required argument: --secret"));
            }
            Ok(())
        })
    }

    #[test]
    fn blank_secret_is_an_error() -> anyhow::Result<()> {
        clean_env(|| {
            let matches = command().try_get_matches_from(["tessera", "--secret", "   "])?;
            assert!(Options::parse(&matches).is_err());
            Ok(())
        })
    }

    #[test]
    fn zero_ttl_is_rejected_by_clap() {
        clean_env(|| {
            let result = command().try_get_matches_from([
                "tessera",
                "--secret",
                "s",
                "--token-ttl-seconds",
                "0",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn invalid_public_url_is_an_error() -> anyhow::Result<()> {
        clean_env(|| {
            let matches = command().try_get_matches_from([
                "tessera",
                "--secret",
                "s",
                "--public-url",
                "not a url",
            ])?;
            assert!(Options::parse(&matches).is_err());
            Ok(())
        })
    }

    #[test]
    fn env_values_are_read() {
        temp_env::with_vars(
            [
                ("TESSERA_SECRET", Some("from-env")),
                ("TESSERA_TOKEN_TTL_SECONDS", Some("60")),
                ("TESSERA_LOGIN_EMAIL", Some("admin@example.com")),
                ("TESSERA_LOGIN_PASSWORD", Some("Passw0rd!")),
                ("TESSERA_PUBLIC_URL", Some("https://gate.example.com")),
                ("TESSERA_PROTECTED_PREFIX", Some("/api")),
            ],
            || {
                let matches = command().get_matches_from(["tessera"]);
                let options = Options::parse(&matches);
                assert!(options.is_ok());
                if let Ok(options) = options {
                    assert_eq!(options.secret.expose_secret(), "from-env");
                    assert_eq!(options.token_ttl_seconds, 60);
                    assert_eq!(options.login_email.as_deref(), Some("admin@example.com"));
                    assert_eq!(options.login_password.expose_secret(), "Passw0rd!");
                    assert_eq!(
                        options.public_url.as_ref().map(Url::scheme),
                        Some("https")
                    );
                    assert_eq!(options.protected_prefix, "/api");
                }
            },
        );
    }
}
