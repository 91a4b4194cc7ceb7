//! The session guard: one injectable context owning the session, its
//! persisted copy and the navigator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use pdv_auth::{
    AccessDecision, AuthData, DenialReason, NavigationTarget, Role, Session, SessionState, UserProfile,
    check_page_access, main_role, redirect_based_on_role, require_auth,
};

use crate::navigator::{Navigator, dispatch};
use crate::storage::{SessionStorage, StorageError, StorageKeys};

/// Handle shared by the HTTP client and page code.
///
/// Never hold the lock across an `.await`.
pub type SharedGuard = Arc<Mutex<SessionGuard>>;

pub fn lock(guard: &SharedGuard) -> MutexGuard<'_, SessionGuard> {
    guard.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionGuard {
    session: Session,
    storage: Box<dyn SessionStorage>,
    navigator: Box<dyn Navigator>,
    keys: StorageKeys,
}

impl core::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("state", &self.state())
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl SessionGuard {
    /// Restore the session from persisted storage.
    ///
    /// A stored user that is not valid JSON is logged and ignored; storage
    /// read failures are returned.
    pub fn load(
        storage: impl SessionStorage + 'static,
        navigator: impl Navigator + 'static,
        keys: StorageKeys,
    ) -> Result<Self, StorageError> {
        let token = storage.get(&keys.token)?;
        let user = match storage.get(&keys.user)? {
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, key = %keys.user, "ignoring unreadable stored user");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            session: Session::from_parts(token, user),
            storage: Box::new(storage),
            navigator: Box::new(navigator),
            keys,
        })
    }

    pub fn into_shared(self) -> SharedGuard {
        Arc::new(Mutex::new(self))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Store a fresh login, then send the user to their landing page.
    ///
    /// Storage is written before memory; if persisting fails the in-memory
    /// session is left untouched.
    pub fn establish(&mut self, auth: AuthData) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&auth.user)?;

        self.storage.set(&self.keys.token, &auth.token)?;
        if let Err(err) = self.storage.set(&self.keys.user, &user_json) {
            if let Err(rollback) = self.storage.remove(&self.keys.token) {
                tracing::error!(
                    error = %rollback,
                    key = %self.keys.token,
                    "failed to roll back persisted token"
                );
            }
            return Err(err);
        }

        tracing::info!(
            user = auth.user.display_name().unwrap_or("<unnamed>"),
            role = ?main_role(&auth.user.roles),
            "session established"
        );
        self.session.establish(auth.token, auth.user);

        self.redirect_based_on_role();
        Ok(())
    }

    /// Clear memory and storage, then go to the login page. Idempotent.
    pub fn logout(&mut self) {
        self.session.clear();

        for key in [&self.keys.token, &self.keys.user] {
            if let Err(err) = self.storage.remove(key) {
                tracing::error!(error = %err, %key, "failed to clear persisted session");
            }
        }

        tracing::info!("logged out");
        self.navigator.navigate(NavigationTarget::Login);
    }

    /// Response interceptor for a 401 from any endpoint.
    pub fn handle_unauthorized(&mut self) {
        tracing::warn!(state = ?self.state(), "server rejected credentials; ending session");
        self.logout();
    }

    /// Request interceptor: `Bearer <token>` whenever a token is held, even
    /// an expired one; the server decides.
    pub fn authorization_header(&self) -> Option<String> {
        self.session.token().map(|token| format!("Bearer {token}"))
    }

    pub fn state(&self) -> SessionState {
        self.session.state(Utc::now())
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.session.is_authenticated(now)
    }

    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now())
    }

    pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.session.is_token_expired(now)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.session.has_role(role)
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn is_user(&self) -> bool {
        self.session.is_user()
    }

    pub fn main_role(&self) -> Option<Role> {
        self.session.main_role()
    }

    pub fn redirect_based_on_role(&mut self) {
        let intent = redirect_based_on_role(&self.session, &self.navigator.current_path());
        dispatch(&mut *self.navigator, intent);
    }

    /// Page-entry guard. Navigates to `/login` or `/unauthorized` on denial.
    pub fn require_auth(&mut self, required_role: Option<&Role>) -> bool {
        let decision = require_auth(&self.session, required_role, Utc::now());
        if let Some(reason) = denial_reason(&decision) {
            tracing::debug!(?reason, "page entry refused");
        }
        dispatch(&mut *self.navigator, decision.intent());
        decision.is_granted()
    }

    /// Role gate for the current path.
    pub fn check_page_access(&mut self) -> bool {
        let decision = check_page_access(&self.session, &self.navigator.current_path());
        dispatch(&mut *self.navigator, decision.intent());
        decision.is_granted()
    }
}

fn denial_reason(decision: &AccessDecision) -> Option<&DenialReason> {
    match decision {
        AccessDecision::Granted => None,
        AccessDecision::Denied { reason, .. } => Some(reason),
    }
}
