//! Auth handlers and supporting modules.
//!
//! This module covers the whole token lifecycle: credential checks at login,
//! HS256 token issuance, the `token` cookie channel and the access guard that
//! gates the protected namespace.
//!
//! ## Session channel
//!
//! The issued token is returned in the response body and written to a
//! `token` cookie. Protected requests must present the same value twice: as
//! `Authorization: Bearer <token>` and in the cookie. The cookie is the only
//! session state; a new login overwrites it and nothing is kept server side.
//!
//! ## Signing secret
//!
//! The HS256 secret is provided at startup and wrapped in a [`SigningKey`].
//! A missing or blank secret is a [`ConfigError`] and aborts startup.

mod credentials;
mod error;
pub(crate) mod guard;
pub(crate) mod login;
pub(crate) mod logout;
mod state;
mod token;
mod transport;
pub(crate) mod types;
mod utils;

pub use credentials::{CredentialStore, CredentialValidator, StaticCredentialStore, Verdict};
pub use error::{AuthError, ErrorResponse, FieldError};
pub use guard::{AccessGuard, Decision, GuardCheck, Inspection, RejectReason, access_guard};
pub use state::{AuthConfig, AuthState, ConfigError};
pub(crate) use state::{DEFAULT_PROTECTED_PREFIX, DEFAULT_TOKEN_TTL_SECONDS};
pub use token::{Claims, SigningKey, TokenError, TokenIssuer};
pub use transport::{CookieTransport, TOKEN_COOKIE_NAME};
pub use types::{LoginRequest, LoginResponse};
