#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]
//! # Mzima client state core
//!
//! The process-wide [`SessionService`] keeps the session, the user profile,
//! the deployment configuration and two UI preferences in sync with their
//! persisted copies, and publishes every change as a replay-latest stream.
//! The [`navigation`] and [`shell`] modules carry the mobile shell glue:
//! double-tap-to-exit on Android, connection notices and the iOS update
//! check.
//!
//! ```
//! use client::{MemoryStore, SessionService};
//! use shared::config::ClientConfig;
//! use shared::models::SessionToken;
//! use std::rc::Rc;
//!
//! let service = SessionService::new(
//!     Rc::new(MemoryStore::new()),
//!     Rc::new(MemoryStore::new()),
//!     &ClientConfig::default(),
//! );
//! service
//!     .set_session_data(SessionToken {
//!         access_token: "abc".into(),
//!         ..SessionToken::default()
//!     })
//!     .unwrap();
//! assert_eq!(service.current_auth_token(), "abc");
//! ```

pub mod errors;
pub mod logging;
pub mod navigation;
pub mod reactive;
pub mod shell;
pub mod state;
pub mod storage;

pub use errors::{StateError, StateResult, StorageError};
pub use navigation::{BackButtonDispatcher, BackButtonEvent, DoubleTapExit, NavigationHost};
pub use reactive::{Observable, Subscription};
pub use shell::{MobileShell, ShellPlatform};
pub use state::SessionService;
pub use storage::{KeyValueStore, MemoryStore, NamespacedStorage, StorageOp};
