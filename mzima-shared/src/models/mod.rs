//! # Models
//!
//! Data shapes shared by the client state core: session token, user
//! profile and deployment configuration.

pub mod deployment;
pub mod session;
pub mod user;

pub use deployment::{
    ConfigCategory, ConfigMap, DeploymentConfig, DeploymentInfo, DonationConfig, DonationImage,
    is_truthy,
};
pub use session::{SessionField, SessionToken};
pub use user::{FieldValue, UserField, UserProfile, UserProfileUpdate};
