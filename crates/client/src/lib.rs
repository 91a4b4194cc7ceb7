//! `pdv-client`
//!
//! **Responsibility:** the effectful half of the PDV session guard.
//!
//! This crate provides:
//! - Persisted session storage (`localStorage` semantics)
//! - The injectable `SessionGuard` context and its navigator seam
//! - An HTTP client whose interceptors attach the bearer token and end the
//!   session on any `401`
//! - Typed access to the product catalog endpoints
//!
//! Policy (expiry, roles, where to navigate) lives in `pdv-auth`.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod storage;
pub mod types;

pub use api::PdvClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, GENERIC_LOGIN_FAILURE};
pub use guard::{SessionGuard, SharedGuard};
pub use navigator::{Navigator, RecordingNavigator};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, StorageKeys};
pub use types::{Product, ProductValidationError, search_products};
