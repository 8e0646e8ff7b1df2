//! # rollcall-session
//!
//! Capture session loops.
//! The attendance poller submits one snapshot per interval for
//! recognition; the enrollment sequencer captures samples for a named
//! subject until the target count is accepted. Both report through the
//! `StatusDisplay` port and publish every outcome on the session event bus.

pub mod announcer;
pub mod attendance;
pub mod enrollment;
pub mod event_bus;

#[cfg(test)]
mod test_support;
