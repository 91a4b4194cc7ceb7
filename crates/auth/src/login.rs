//! Login request and response payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::UserProfile;

/// Field names the backend has used for the bearer token, in lookup order.
const TOKEN_FIELDS: [&str; 3] = ["token", "access_token", "jwt"];

/// Field names the backend has used for the user profile, in lookup order.
/// The whole body is the last resort.
const USER_FIELDS: [&str; 3] = ["user", "usuario", "data"];

/// Login form contents, sent as `{ "login": ..., "password": ... }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Trim the login and reject empty fields before anything hits the
    /// network. The password is sent verbatim.
    pub fn validate(self) -> Result<Self, CredentialsError> {
        let login = self.login.trim().to_string();
        if login.is_empty() {
            return Err(CredentialsError::MissingField("login"));
        }
        if self.password.is_empty() {
            return Err(CredentialsError::MissingField("password"));
        }
        Ok(Self {
            login,
            password: self.password,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoginPayloadError {
    #[error("login response carries no token{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    MissingToken(Option<String>),

    #[error("login response user profile is malformed: {0}")]
    InvalidUser(String),
}

/// Token plus profile extracted from a successful login response.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthData {
    pub token: String,
    pub user: UserProfile,
}

impl AuthData {
    /// Normalize the login response body.
    ///
    /// The token is the first non-empty string among `token`, `access_token`
    /// and `jwt`. The profile is the first present object among `user`,
    /// `usuario` and `data`, or the body itself.
    pub fn from_response(body: &Value) -> Result<Self, LoginPayloadError> {
        let token = TOKEN_FIELDS
            .iter()
            .filter_map(|field| body.get(field).and_then(Value::as_str))
            .find(|token| !token.is_empty())
            .ok_or_else(|| LoginPayloadError::MissingToken(server_message(body)))?;

        let user_value = USER_FIELDS
            .iter()
            .filter_map(|field| body.get(field))
            .find(|value| !value.is_null())
            .unwrap_or(body);

        let user: UserProfile = serde_json::from_value(user_value.clone())
            .map_err(|e| LoginPayloadError::InvalidUser(e.to_string()))?;

        Ok(Self {
            token: token.to_string(),
            user,
        })
    }
}

/// `message` field of an error (or success) body, if the server sent one.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use serde_json::json;

    #[test]
    fn validate_trims_login_and_keeps_password() {
        let creds = Credentials::new("  caixa01 ", " senha ").validate().unwrap();
        assert_eq!(creds.login, "caixa01");
        assert_eq!(creds.password, " senha ");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            Credentials::new("   ", "x").validate(),
            Err(CredentialsError::MissingField("login"))
        );
        assert_eq!(
            Credentials::new("caixa", "").validate(),
            Err(CredentialsError::MissingField("password"))
        );
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("caixa", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn canonical_response_shape() {
        let body = json!({"token": "a.b.c", "user": {"login": "gerente", "roles": ["ROLE_ADMIN"]}});
        let auth = AuthData::from_response(&body).unwrap();
        assert_eq!(auth.token, "a.b.c");
        assert_eq!(auth.user.roles, vec![Role::ADMIN]);
        assert_eq!(auth.user.login.as_deref(), Some("gerente"));
    }

    #[test]
    fn alternative_field_names() {
        let body = json!({"access_token": "x.y.z", "usuario": {"username": "op", "roles": ["ROLE_USER"]}});
        let auth = AuthData::from_response(&body).unwrap();
        assert_eq!(auth.token, "x.y.z");
        assert_eq!(auth.user.username.as_deref(), Some("op"));

        let body = json!({"jwt": "j.w.t", "data": {"roles": []}});
        assert_eq!(AuthData::from_response(&body).unwrap().token, "j.w.t");
    }

    #[test]
    fn whole_body_is_profile_fallback() {
        let body = json!({"token": "a.b.c", "login": "op", "roles": ["ROLE_USER"]});
        let auth = AuthData::from_response(&body).unwrap();
        assert_eq!(auth.user.login.as_deref(), Some("op"));
        assert_eq!(auth.user.roles, vec![Role::USER]);
        assert_eq!(auth.user.extra.get("token"), Some(&json!("a.b.c")));
    }

    #[test]
    fn missing_token_carries_server_message() {
        let err = AuthData::from_response(&json!({"message": "Credenciais inválidas"})).unwrap_err();
        assert_eq!(err, LoginPayloadError::MissingToken(Some("Credenciais inválidas".into())));
        assert_eq!(err.to_string(), "login response carries no token: Credenciais inválidas");

        let err = AuthData::from_response(&json!({"token": ""})).unwrap_err();
        assert_eq!(err, LoginPayloadError::MissingToken(None));
    }

    #[test]
    fn null_roles_still_log_in_without_roles() {
        let body = json!({"token": "a.b.c", "user": {"login": "op", "roles": null}});
        let auth = AuthData::from_response(&body).unwrap();
        assert!(auth.user.roles.is_empty());
        assert_eq!(auth.user.login.as_deref(), Some("op"));
    }

    #[test]
    fn non_object_user_is_rejected() {
        let err = AuthData::from_response(&json!({"token": "a.b.c", "user": "op"})).unwrap_err();
        assert!(matches!(err, LoginPayloadError::InvalidUser(_)));
    }
}
