use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier attached to a user profile (e.g. `ROLE_ADMIN`).
///
/// Roles are opaque strings issued by the backend; only the two well-known
/// roles below carry meaning for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Back-office administrator, lands on the dashboard.
    pub const ADMIN: Role = Role(Cow::Borrowed("ROLE_ADMIN"));

    /// Point-of-sale operator, lands on the PDV screen.
    pub const USER: Role = Role(Cow::Borrowed("ROLE_USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

/// Pick the role that decides where a user lands.
///
/// Priority is fixed: `ROLE_ADMIN` wins over `ROLE_USER`; any other roles
/// are ignored.
pub fn main_role(roles: &[Role]) -> Option<Role> {
    [Role::ADMIN, Role::USER]
        .into_iter()
        .find(|candidate| roles.contains(candidate))
}
