//! Enrollment sequencer.
//!
//! Captures samples for one named subject and submits them to the
//! registration endpoint until `total` have been accepted. Each iteration
//! waits for its submission to settle, then sleeps `capture_delay` before
//! the next one, so iterations never overlap. Rejected samples are not
//! counted and the loop simply tries again.

use rollcall_core::error::CoreError;
use rollcall_core::models::enrollment::{EnrollmentProgress, TOTAL_IMAGES};
use rollcall_core::models::event::SessionEvent;
use rollcall_core::ports::api_client::RecognitionApi;
use rollcall_core::ports::display::{ControlState, StatusDisplay};
use rollcall_vision::capture::CaptureSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::event_bus::SessionEventBus;

/// Pause between a settled submission and the next capture
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(100);

const STATUS_READY: &str = "Camera started. Enter name and click Capture.";
const STATUS_CAMERA_ERROR: &str = "Error accessing webcam. Please allow permissions.";
const STATUS_CAPTURING: &str = "Capturing images...";
const STATUS_CANCELLED: &str = "Capture cancelled.";
const ALERT_EMPTY_NAME: &str = "Please enter a name.";

/// How an enrollment run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Completed { name: String, total: u32 },
    Cancelled { name: String, captured: u32 },
}

/// Requests cancellation of a running enrollment.
///
/// Observed between iterations; a submission already in flight settles
/// first.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    running: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.running.store(false, Ordering::Release);
    }
}

pub struct EnrollmentSequencer {
    capture: CaptureSource,
    api: Arc<dyn RecognitionApi>,
    display: Arc<dyn StatusDisplay>,
    events: SessionEventBus,
    progress: EnrollmentProgress,
    capture_delay: Duration,
    running: Arc<AtomicBool>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl EnrollmentSequencer {
    pub fn new(
        capture: CaptureSource,
        api: Arc<dyn RecognitionApi>,
        display: Arc<dyn StatusDisplay>,
    ) -> Self {
        display.set_controls(ControlState::PRE_START);
        Self {
            capture,
            api,
            display,
            events: SessionEventBus::default(),
            progress: EnrollmentProgress::new(TOTAL_IMAGES),
            capture_delay: DEFAULT_CAPTURE_DELAY,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: None,
        }
    }

    pub fn with_total_images(mut self, total: u32) -> Self {
        self.progress = EnrollmentProgress::new(total);
        self
    }

    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    pub fn with_event_bus(mut self, events: SessionEventBus) -> Self {
        self.events = events;
        self
    }

    /// Cancel the run when this signal flips to `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            running: self.running.clone(),
        }
    }

    pub fn progress(&self) -> EnrollmentProgress {
        self.progress
    }

    pub fn is_camera_active(&self) -> bool {
        self.capture.is_active()
    }

    /// Acquire the camera and enable the capture control
    pub fn start_camera(&mut self) -> Result<(), CoreError> {
        match self.capture.start() {
            Ok(_) => {
                self.display.set_controls(ControlState::READY_TO_CAPTURE);
                self.display.set_status(STATUS_READY);
                self.events.publish(SessionEvent::CameraStarted);
                Ok(())
            }
            Err(e) => {
                warn!("error accessing webcam: {e}");
                self.display.set_status(STATUS_CAMERA_ERROR);
                self.display.set_controls(ControlState::PRE_START);
                Err(e)
            }
        }
    }

    pub fn stop_camera(&mut self) {
        if self.capture.is_active() {
            self.capture.stop();
            self.events.publish(SessionEvent::CameraStopped);
        }
    }

    /// Run one enrollment for `name` until `total` samples are accepted or
    /// the run is cancelled.
    pub async fn begin(&mut self, name: &str) -> Result<EnrollmentOutcome, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            self.display.alert(ALERT_EMPTY_NAME);
            return Err(CoreError::Validation {
                field: "name".to_string(),
                message: ALERT_EMPTY_NAME.to_string(),
            });
        }

        if !self.capture.is_active() {
            return Err(CoreError::SessionInactive);
        }

        self.running.store(true, Ordering::Release);
        self.display.set_controls(ControlState::CAPTURING);
        self.progress.reset();
        self.display.show_progress(&self.progress);
        self.display.set_status(STATUS_CAPTURING);
        info!(
            "enrollment started for {name} ({} samples)",
            self.progress.total()
        );

        loop {
            if self.progress.is_complete() {
                return Ok(self.complete(name));
            }

            if self.cancel_requested() {
                return Ok(self.cancel(name));
            }

            self.capture_once(name).await;
            tokio::time::sleep(self.capture_delay).await;
        }
    }

    fn cancel_requested(&self) -> bool {
        if !self.running.load(Ordering::Acquire) {
            return true;
        }
        self.shutdown
            .as_ref()
            .is_some_and(|shutdown| *shutdown.borrow())
    }

    async fn capture_once(&mut self, name: &str) {
        let snapshot = match self.capture.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("snapshot failed: {e}");
                self.events.publish(SessionEvent::SampleRejected {
                    reason: e.to_string(),
                });
                return;
            }
        };

        match self.api.register(name, &snapshot).await {
            Ok(()) => {
                self.progress.record_success();
                self.display.show_progress(&self.progress);
                debug!("sample accepted: {}", self.progress.label());
                self.events.publish(SessionEvent::SampleAccepted {
                    progress: self.progress,
                });
            }
            Err(e) => {
                warn!("failed to capture image: {e}");
                self.events.publish(SessionEvent::SampleRejected {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn complete(&mut self, name: &str) -> EnrollmentOutcome {
        let total = self.progress.total();
        self.running.store(false, Ordering::Release);
        self.stop_camera();
        self.display
            .set_status(&format!("Captured {total} images for {name}. Done!"));
        self.display.set_controls(ControlState::ENROLLMENT_DONE);
        self.events.publish(SessionEvent::EnrollmentCompleted {
            name: name.to_string(),
            total,
        });
        info!("enrollment completed for {name}");

        EnrollmentOutcome::Completed {
            name: name.to_string(),
            total,
        }
    }

    fn cancel(&mut self, name: &str) -> EnrollmentOutcome {
        let captured = self.progress.captured();
        self.running.store(false, Ordering::Release);
        self.stop_camera();
        self.display.set_status(STATUS_CANCELLED);
        self.display.set_controls(ControlState::ENROLLMENT_DONE);
        self.events.publish(SessionEvent::EnrollmentCancelled {
            name: name.to_string(),
            captured,
        });
        info!("enrollment cancelled for {name} at {}", self.progress.label());

        EnrollmentOutcome::Cancelled {
            name: name.to_string(),
            captured,
        }
    }
}
