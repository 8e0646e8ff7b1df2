//! Status display port.
//!
//! The user-facing surface driven by the session components: control
//! enablement, status text, progress bar, last-recognition panel and
//! blocking alerts.
//!
//! Implementation: `rollcall-app` (terminal presenter)

use crate::models::enrollment::EnrollmentProgress;

/// Which controls are currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub start: bool,
    pub stop: bool,
    pub capture: bool,
}

impl ControlState {
    /// Nothing acquired yet: only start is available
    pub const PRE_START: ControlState = ControlState {
        start: true,
        stop: false,
        capture: false,
    };

    /// Attendance polling: only stop is available
    pub const POLLING: ControlState = ControlState {
        start: false,
        stop: true,
        capture: false,
    };

    /// Camera live, waiting for an enrollment name
    pub const READY_TO_CAPTURE: ControlState = ControlState {
        start: false,
        stop: false,
        capture: true,
    };

    /// Enrollment run in progress
    pub const CAPTURING: ControlState = ControlState {
        start: false,
        stop: false,
        capture: false,
    };

    /// Enrollment run finished or cancelled; camera released
    pub const ENROLLMENT_DONE: ControlState = ControlState {
        start: true,
        stop: false,
        capture: true,
    };
}

impl Default for ControlState {
    fn default() -> Self {
        Self::PRE_START
    }
}

pub trait StatusDisplay: Send + Sync {
    /// Replace the status line
    fn set_status(&self, text: &str);

    /// Apply control enablement
    fn set_controls(&self, controls: ControlState);

    /// Show `message` in the last-recognition panel and make it visible
    fn show_recognition(&self, message: &str);

    /// Show the progress bar at `progress`
    fn show_progress(&self, progress: &EnrollmentProgress);

    /// Blocking user alert
    fn alert(&self, message: &str);
}
