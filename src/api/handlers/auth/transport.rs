//! Cookie side channel for issued tokens.
//!
//! The signed token proves identity; this module only decides how it travels.
//! The cookie holds the last issued token for the client, so a new login
//! simply overwrites it.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

pub const TOKEN_COOKIE_NAME: &str = "token";

#[derive(Clone, Debug)]
pub struct CookieTransport {
    max_age_seconds: i64,
    secure: bool,
}

impl CookieTransport {
    #[must_use]
    pub const fn new(max_age_seconds: i64, secure: bool) -> Self {
        Self {
            max_age_seconds,
            secure,
        }
    }

    /// Build the `Set-Cookie` value carrying `token`.
    pub fn record(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        let max_age = self.max_age_seconds;
        let mut cookie =
            format!("{TOKEN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Build a `Set-Cookie` value that expires the token cookie.
    pub fn clear(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!("{TOKEN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Read the token cookie from a request, if present and non-empty.
    #[must_use]
    pub fn retrieve(headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (key, val) = pair.trim().split_once('=')?;
                (key.trim() == TOKEN_COOKIE_NAME).then(|| val.trim().to_string())
            })
            .find(|val| !val.is_empty())
    }
}
