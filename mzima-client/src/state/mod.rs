//! # State
//!
//! Stores for session, user profile, deployment configuration and UI
//! preferences, the access policy derived from them, and the
//! [`SessionService`] that owns them all.
//!
//! Every mutation writes through to storage before the new snapshot is
//! published, so a subscriber woken by a publish can rely on persisted state
//! already matching it.

pub mod deployment;
pub mod policy;
pub mod preferences;
pub mod service;
pub mod session;
pub mod user;

pub use deployment::DeploymentStore;
pub use preferences::{PreferenceFlag, UiPreferences};
pub use service::SessionService;
pub use session::SessionStore;
pub use user::UserStore;
