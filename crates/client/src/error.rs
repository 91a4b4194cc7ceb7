use thiserror::Error;

use pdv_auth::{CredentialsError, LoginPayloadError};

use crate::storage::StorageError;
use crate::types::ProductValidationError;

/// Message used when a failed login response carries none of its own.
pub const GENERIC_LOGIN_FAILURE: &str = "login failed";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Login rejected by the server, or the response could not be used.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Transport failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered 401; the session has already been cleared.
    #[error("session is no longer authorized")]
    Unauthorized,

    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid product: {0}")]
    Validation(#[from] ProductValidationError),
}

impl From<LoginPayloadError> for ClientError {
    fn from(err: LoginPayloadError) -> Self {
        match err {
            LoginPayloadError::MissingToken(Some(message)) => ClientError::Auth(message),
            LoginPayloadError::MissingToken(None) => ClientError::Auth(GENERIC_LOGIN_FAILURE.to_string()),
            LoginPayloadError::InvalidUser(msg) => ClientError::Decode(msg),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
