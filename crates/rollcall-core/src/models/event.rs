//! Session outcome events.
//!
//! Published by the attendance and enrollment components so that every
//! cycle's outcome is observable, including the ones that are otherwise
//! only logged.

use super::enrollment::EnrollmentProgress;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CameraStarted,
    CameraStopped,
    /// A poll matched a known identity
    Recognized { label: String, message: String },
    /// A poll completed without a match
    NoMatch { message: Option<String> },
    /// A poll tick fired while the previous submission was still in flight
    TickSkipped,
    /// Snapshot or transport failure during a poll
    SubmissionFailed { error: String },
    /// The backend accepted an enrollment sample
    SampleAccepted { progress: EnrollmentProgress },
    /// The sample was not counted (no face, save failed, network)
    SampleRejected { reason: String },
    EnrollmentCompleted { name: String, total: u32 },
    EnrollmentCancelled { name: String, captured: u32 },
}
