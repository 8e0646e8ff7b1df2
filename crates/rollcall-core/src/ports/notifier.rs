//! Match announcement port.
//!
//! Optional collaborator invoked when attendance polling recognizes someone
//! (e.g. text-to-speech).
//!
//! Implementation: `rollcall-session::announcer`

use async_trait::async_trait;

use crate::error::CoreError;

#[async_trait]
pub trait Announcer: Send + Sync {
    /// Announce a recognized identity
    async fn announce(&self, label: &str) -> Result<(), CoreError>;
}
