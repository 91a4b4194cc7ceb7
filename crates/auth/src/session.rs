use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claims::is_token_expired;
use crate::{Role, UserProfile, main_role};

/// Derived lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No token or no user.
    LoggedOut,
    /// Token and user present, token not expired.
    LoggedIn,
    /// Token and user present, token expired. Denied like `LoggedOut`, but
    /// kept until an explicit logout or a 401 clears it.
    Expired,
}

/// In-memory session: bearer token plus the profile it was issued for.
///
/// # Invariants
/// - `establish` and `clear` always set/clear both halves together.
/// - `from_parts` may observe only one half when persisted storage was
///   partially cleared; every check below treats that as logged out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(token: Option<String>, user: Option<UserProfile>) -> Self {
        Self { token, user }
    }

    pub fn establish(&mut self, token: String, user: UserProfile) {
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_token_expired(&self, now: DateTime<Utc>) -> bool {
        is_token_expired(self.token(), now)
    }

    /// Token present and not expired. The signature is not verified.
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_token_expired(now)
    }

    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        match (&self.token, &self.user) {
            (Some(_), Some(_)) if self.is_token_expired(now) => SessionState::Expired,
            (Some(_), Some(_)) => SessionState::LoggedIn,
            _ => SessionState::LoggedOut,
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.user.as_ref().is_some_and(|user| user.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::ADMIN)
    }

    pub fn is_user(&self) -> bool {
        self.has_role(&Role::USER)
    }

    pub fn main_role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|user| main_role(&user.roles))
    }
}
