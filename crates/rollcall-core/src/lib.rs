//! # rollcall-core
//!
//! Rollcall domain models, port (trait) definitions and error type.
//! Shared by every other crate in the workspace.
//!
//! ## Layout
//!
//! - [`models`]: domain data (frames, recognition results, progress)
//! - [`ports`]: hexagonal ports (camera, backend API, display, announcer)
//! - [`error`]: core error type (thiserror)
//! - [`config`]: application configuration
//! - [`config_manager`]: config file load-or-create

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
