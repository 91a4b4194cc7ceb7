//! User profile as returned by the authentication endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::Role;

/// Profile of the logged-in user.
///
/// The backend owns the shape of this object; only `roles` and the login
/// name are interpreted. Unknown fields are kept so the profile survives a
/// round trip through persisted storage unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "roles_or_empty")]
    pub roles: Vec<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn with_roles(login: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            roles,
            login: Some(login.into()),
            ..Default::default()
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Best-effort display name: `login`, then `username`, then `email`/`nome`.
    pub fn display_name(&self) -> Option<&str> {
        self.login
            .as_deref()
            .or(self.username.as_deref())
            .or_else(|| self.extra.get("email").and_then(Value::as_str))
            .or_else(|| self.extra.get("nome").and_then(Value::as_str))
    }
}

/// `null`, a non-array value or non-string entries count as no roles.
fn roles_or_empty<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(Role::new(name)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_round_trip() {
        let raw = json!({
            "login": "gerente",
            "roles": ["ROLE_ADMIN"],
            "nome": "Maria",
            "loja": 3
        });

        let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(profile.roles, vec![Role::ADMIN]);
        assert_eq!(profile.extra.get("loja"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
    }

    #[test]
    fn missing_roles_means_no_roles() {
        let profile: UserProfile = serde_json::from_value(json!({"username": "caixa"})).unwrap();
        assert!(profile.roles.is_empty());
        assert!(!profile.has_role(&Role::USER));
    }

    #[test]
    fn null_or_malformed_roles_mean_no_roles() {
        let profile: UserProfile = serde_json::from_value(json!({"login": "op", "roles": null})).unwrap();
        assert!(profile.roles.is_empty());
        assert!(!profile.has_role(&Role::ADMIN));
        assert_eq!(profile.display_name(), Some("op"));

        let profile: UserProfile =
            serde_json::from_value(json!({"roles": ["ROLE_USER", 7, null, {"name": "x"}]})).unwrap();
        assert_eq!(profile.roles, vec![Role::USER]);

        let profile: UserProfile = serde_json::from_value(json!({"roles": "ROLE_ADMIN"})).unwrap();
        assert!(profile.roles.is_empty());
    }

    #[test]
    fn display_name_prefers_login() {
        let profile: UserProfile =
            serde_json::from_value(json!({"username": "u", "email": "e@x", "login": "l"})).unwrap();
        assert_eq!(profile.display_name(), Some("l"));

        let profile: UserProfile = serde_json::from_value(json!({"nome": "Ana"})).unwrap();
        assert_eq!(profile.display_name(), Some("Ana"));
    }
}
