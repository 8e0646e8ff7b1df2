//! Port interfaces (traits).
//!
//! Each adapter crate implements these traits and `rollcall-app` wires
//! them together as `Arc<dyn T>` / `Box<dyn T>`.
//!
//! Async ports use the `async_trait` macro so they stay object safe.

pub mod api_client;
pub mod camera;
pub mod display;
pub mod notifier;
