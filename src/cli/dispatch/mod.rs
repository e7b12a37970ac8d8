//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, auth};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        secret: auth_opts.secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        login_email: auth_opts.login_email,
        login_password: auth_opts.login_password,
        public_url: auth_opts.public_url,
        protected_prefix: auth_opts.protected_prefix,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_required() {
        temp_env::with_vars([("TESSERA_SECRET", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec!["tessera"]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(
                    err.to_string()
                        .contains("missing required argument: --secret")
                );
            }
        });
    }

    #[test]
    fn server_action_carries_options() {
        temp_env::with_vars(
            [
                ("TESSERA_SECRET", Some("s3cret")),
                ("TESSERA_PORT", Some("8181")),
                ("TESSERA_TOKEN_TTL_SECONDS", Some("120")),
                ("TESSERA_PROTECTED_PREFIX", None),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["tessera"]);
                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 8181);
                    assert_eq!(args.token_ttl_seconds, 120);
                    assert_eq!(args.protected_prefix, "/index");
                }
            },
        );
    }
}
