//! Page-access policy, expressed as pure decisions.
//!
//! Nothing here navigates. Callers get a [`NavigationIntent`] or an
//! [`AccessDecision`] and hand it to whatever owns the browser location.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Role, Session};

/// Pages the guard can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    Login,
    Dashboard,
    Pdv,
    Unauthorized,
}

impl NavigationTarget {
    pub fn path(&self) -> &'static str {
        match self {
            NavigationTarget::Login => "/login",
            NavigationTarget::Dashboard => "/dashboard",
            NavigationTarget::Pdv => "/pdv",
            NavigationTarget::Unauthorized => "/unauthorized",
        }
    }
}

impl core::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum NavigationIntent {
    Stay,
    Navigate(NavigationTarget),
}

/// Why a page was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "role")]
pub enum DenialReason {
    /// No token, or the token is expired.
    NotAuthenticated,
    MissingRole(Role),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum AccessDecision {
    Granted,
    Denied {
        redirect: NavigationTarget,
        reason: DenialReason,
    },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn intent(&self) -> NavigationIntent {
        match self {
            AccessDecision::Granted => NavigationIntent::Stay,
            AccessDecision::Denied { redirect, .. } => NavigationIntent::Navigate(*redirect),
        }
    }

    fn missing(role: Role) -> Self {
        AccessDecision::Denied {
            redirect: NavigationTarget::Unauthorized,
            reason: DenialReason::MissingRole(role),
        }
    }
}

/// Landing page for the session's user: dashboard for admins, PDV for
/// operators, nothing for anyone else.
pub fn landing_for(session: &Session) -> Option<NavigationTarget> {
    if session.is_admin() {
        Some(NavigationTarget::Dashboard)
    } else if session.is_user() {
        Some(NavigationTarget::Pdv)
    } else {
        None
    }
}

/// Where to send the user after login.
///
/// Stays put when already on the role's landing page, so calling this from
/// the landing page itself never loops.
pub fn redirect_based_on_role(session: &Session, current_path: &str) -> NavigationIntent {
    if session.user().is_none() {
        return NavigationIntent::Stay;
    }

    if session.is_admin() && current_path.contains(NavigationTarget::Dashboard.path()) {
        return NavigationIntent::Stay;
    }
    if session.is_user() && current_path.contains(NavigationTarget::Pdv.path()) {
        return NavigationIntent::Stay;
    }

    match landing_for(session) {
        Some(target) => NavigationIntent::Navigate(target),
        None => NavigationIntent::Stay,
    }
}

/// Page-entry guard.
pub fn require_auth(
    session: &Session,
    required_role: Option<&Role>,
    now: DateTime<Utc>,
) -> AccessDecision {
    if !session.is_authenticated(now) {
        return AccessDecision::Denied {
            redirect: NavigationTarget::Login,
            reason: DenialReason::NotAuthenticated,
        };
    }

    match required_role {
        Some(role) if !session.has_role(role) => AccessDecision::missing(role.clone()),
        _ => AccessDecision::Granted,
    }
}

/// Role gate for the current path: `/dashboard` needs admin, `/pdv` needs
/// user. Other paths are open.
pub fn check_page_access(session: &Session, current_path: &str) -> AccessDecision {
    if current_path.contains(NavigationTarget::Dashboard.path()) && !session.is_admin() {
        return AccessDecision::missing(Role::ADMIN);
    }
    if current_path.contains(NavigationTarget::Pdv.path()) && !session.is_user() {
        return AccessDecision::missing(Role::USER);
    }
    AccessDecision::Granted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::session_with;
    use chrono::Duration;

    fn valid_for(roles: Vec<Role>) -> Session {
        session_with(roles, Utc::now() + Duration::hours(1))
    }

    #[test]
    fn admin_on_login_page_goes_to_dashboard() {
        let session = valid_for(vec![Role::ADMIN]);
        assert_eq!(
            redirect_based_on_role(&session, "/login"),
            NavigationIntent::Navigate(NavigationTarget::Dashboard)
        );
    }

    #[test]
    fn user_already_on_pdv_stays() {
        let session = valid_for(vec![Role::USER]);
        assert_eq!(redirect_based_on_role(&session, "/pdv"), NavigationIntent::Stay);
        assert_eq!(redirect_based_on_role(&session, "/app/pdv.html"), NavigationIntent::Stay);
    }

    #[test]
    fn dual_role_user_on_pdv_stays_but_elsewhere_goes_to_dashboard() {
        let session = valid_for(vec![Role::USER, Role::ADMIN]);
        assert_eq!(redirect_based_on_role(&session, "/pdv"), NavigationIntent::Stay);
        assert_eq!(
            redirect_based_on_role(&session, "/login"),
            NavigationIntent::Navigate(NavigationTarget::Dashboard)
        );
    }

    #[test]
    fn no_user_or_unknown_role_never_redirects() {
        assert_eq!(redirect_based_on_role(&Session::new(), "/login"), NavigationIntent::Stay);
        let session = valid_for(vec![Role::new("ROLE_AUDITOR")]);
        assert_eq!(redirect_based_on_role(&session, "/login"), NavigationIntent::Stay);
    }

    #[test]
    fn require_auth_without_token_sends_to_login() {
        let decision = require_auth(&Session::new(), Some(&Role::ADMIN), Utc::now());
        assert!(!decision.is_granted());
        assert_eq!(decision.intent(), NavigationIntent::Navigate(NavigationTarget::Login));
    }

    #[test]
    fn require_auth_with_expired_token_sends_to_login() {
        let session = session_with(vec![Role::ADMIN], Utc::now() - Duration::minutes(1));
        let decision = require_auth(&session, None, Utc::now());
        assert_eq!(
            decision,
            AccessDecision::Denied {
                redirect: NavigationTarget::Login,
                reason: DenialReason::NotAuthenticated,
            }
        );
    }

    #[test]
    fn require_auth_missing_role_sends_to_unauthorized() {
        let session = valid_for(vec![Role::USER]);
        let decision = require_auth(&session, Some(&Role::ADMIN), Utc::now());
        assert_eq!(
            decision,
            AccessDecision::Denied {
                redirect: NavigationTarget::Unauthorized,
                reason: DenialReason::MissingRole(Role::ADMIN),
            }
        );
    }

    #[test]
    fn require_auth_grants_valid_session() {
        let session = valid_for(vec![Role::USER]);
        assert!(require_auth(&session, None, Utc::now()).is_granted());
        assert!(require_auth(&session, Some(&Role::USER), Utc::now()).is_granted());
        assert_eq!(require_auth(&session, None, Utc::now()).intent(), NavigationIntent::Stay);
    }

    #[test]
    fn page_access_by_path() {
        let operator = valid_for(vec![Role::USER]);
        assert!(check_page_access(&operator, "/pdv").is_granted());
        assert!(check_page_access(&operator, "/produtos").is_granted());
        assert_eq!(
            check_page_access(&operator, "/dashboard").intent(),
            NavigationIntent::Navigate(NavigationTarget::Unauthorized)
        );

        let admin = valid_for(vec![Role::ADMIN]);
        assert!(check_page_access(&admin, "/dashboard").is_granted());
        assert!(!check_page_access(&admin, "/pdv").is_granted());
    }

    #[test]
    fn denial_serializes_for_audit() {
        let decision = require_auth(&valid_for(vec![Role::USER]), Some(&Role::ADMIN), Utc::now());
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            serde_json::json!({
                "decision": "denied",
                "redirect": "unauthorized",
                "reason": {"kind": "missing_role", "role": "ROLE_ADMIN"}
            })
        );
    }
}
