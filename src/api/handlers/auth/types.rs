//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    error::{AuthError, FieldError},
    token::Claims,
    utils::{PASSWORD_RULE, valid_email, valid_password},
};

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Check field shapes before any credential lookup.
    ///
    /// # Errors
    /// Returns [`AuthError::Validation`] listing every failing field.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        if !valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email"));
        }
        if !valid_password(&self.password) {
            errors.push(FieldError::new("password", PASSWORD_RULE));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(errors))
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub payload: Claims,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn field_errors(result: Result<(), AuthError>) -> Vec<FieldError> {
        match result {
            Err(AuthError::Validation(errors)) => errors,
            _ => Vec::new(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("a@b.com", "qwery1234*").validate().is_ok());
    }

    #[test]
    fn weak_passwords_are_rejected() {
        for password in ["short", "alllettersnodigit", "12345678", "abcdefgh1", "abc 1234*"] {
            let errors = field_errors(request("a@b.com", password).validate());
            assert_eq!(errors.len(), 1, "{password:?} should fail");
            assert_eq!(errors[0].field, "password");
            assert_eq!(errors[0].message, PASSWORD_RULE);
        }
    }

    #[test]
    fn every_failing_field_is_reported() {
        let errors = field_errors(request("nope", "short").validate());
        let fields: Vec<&str> = errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", request("a@b.com", "qwery1234*"));
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("qwery1234*"));
    }

    #[test]
    fn login_response_serializes_payload_and_token() -> Result<()> {
        let response = LoginResponse {
            payload: Claims {
                email: "a@b.com".to_string(),
                exp: 42,
            },
            token: "abc.def.ghi".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        let exp = value
            .pointer("/payload/exp")
            .and_then(serde_json::Value::as_i64)
            .context("missing exp")?;
        assert_eq!(exp, 42);
        assert_eq!(value["token"], "abc.def.ghi");
        Ok(())
    }
}
