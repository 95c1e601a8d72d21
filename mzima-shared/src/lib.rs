#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]

//! Shared models and configuration for the Mzima client state core.

pub mod config;
pub mod models;
