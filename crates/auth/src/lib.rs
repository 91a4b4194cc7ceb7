//! `pdv-auth` — session model and page-access policy for the PDV client.
//!
//! This crate is intentionally decoupled from HTTP, storage and the browser:
//! every check takes the current time explicitly and every navigation is
//! returned as a value.

pub mod claims;
pub mod login;
pub mod navigation;
pub mod roles;
pub mod session;
pub mod user;

pub use claims::{TokenClaims, TokenDecodeError, decode_claims, is_token_expired};
pub use login::{AuthData, Credentials, CredentialsError, LoginPayloadError, server_message};
pub use navigation::{
    AccessDecision, DenialReason, NavigationIntent, NavigationTarget, check_page_access, landing_for,
    redirect_based_on_role, require_auth,
};
pub use roles::{Role, main_role};
pub use session::{Session, SessionState};
pub use user::UserProfile;
