//! Attendance poller.
//!
//! `Idle → Running` on start, `Running → Idle` on stop. While running, a
//! fixed-interval timer takes one snapshot per tick and submits it for
//! recognition. A single-flight flag keeps at most one recognition request
//! outstanding: ticks that fire while a request is pending are skipped, so
//! a slow backend never builds up a queue.

use rollcall_core::error::CoreError;
use rollcall_core::models::event::SessionEvent;
use rollcall_core::models::recognition::RecognitionResult;
use rollcall_core::ports::api_client::RecognitionApi;
use rollcall_core::ports::display::{ControlState, StatusDisplay};
use rollcall_core::ports::notifier::Announcer;
use rollcall_vision::capture::CaptureSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::event_bus::SessionEventBus;

/// Default recognition interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2_000);

/// Shortest accepted interval; tokio intervals cannot have a zero period
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

const STATUS_STARTED: &str = "Camera started. Recognizing...";
const STATUS_STOPPED: &str = "Camera stopped.";
const STATUS_CAMERA_ERROR: &str = "Error accessing webcam.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Running,
}

/// What a single tick did
#[derive(Debug)]
pub enum TickOutcome {
    /// Poller is not running
    Idle,
    /// Previous submission still in flight
    Skipped,
    /// Snapshot could not be taken; nothing was submitted
    CaptureFailed,
    /// Submission spawned; the handle resolves once the result is applied
    Submitted(JoinHandle<()>),
}

/// Clears the single-flight flag when the submission task finishes,
/// whichever way it finishes.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AttendancePoller {
    capture: CaptureSource,
    api: Arc<dyn RecognitionApi>,
    display: Arc<dyn StatusDisplay>,
    events: SessionEventBus,
    announcer: Option<Arc<dyn Announcer>>,
    interval: Duration,
    state: PollerState,
    in_flight: Arc<AtomicBool>,
}

impl AttendancePoller {
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
            announcer: None,
            interval: DEFAULT_POLL_INTERVAL,
            state: PollerState::Idle,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Clamped to `MIN_POLL_INTERVAL`
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn with_event_bus(mut self, events: SessionEventBus) -> Self {
        self.events = events;
        self
    }

    /// Announce recognized names
    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn is_submission_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Acquire the camera and enter `Running`.
    ///
    /// Camera failures are shown on the status line and leave the poller
    /// `Idle` with pre-start controls.
    pub fn start(&mut self) -> Result<(), CoreError> {
        if self.state == PollerState::Running {
            return Ok(());
        }

        if let Err(e) = self.capture.start() {
            warn!("error accessing webcam: {e}");
            self.display.set_status(STATUS_CAMERA_ERROR);
            self.display.set_controls(ControlState::PRE_START);
            return Err(e);
        }

        self.state = PollerState::Running;
        self.display.set_controls(ControlState::POLLING);
        self.display.set_status(STATUS_STARTED);
        self.events.publish(SessionEvent::CameraStarted);
        info!(
            "attendance polling started (every {}ms)",
            self.interval.as_millis()
        );
        Ok(())
    }

    /// Cancel the timer and release the camera.
    ///
    /// An in-flight submission is not aborted; its result still reaches
    /// the display when it settles.
    pub fn stop(&mut self) {
        let was_running = self.state == PollerState::Running;
        self.state = PollerState::Idle;
        self.capture.stop();
        self.display.set_controls(ControlState::PRE_START);
        self.display.set_status(STATUS_STOPPED);

        if was_running {
            self.events.publish(SessionEvent::CameraStopped);
            info!("attendance polling stopped");
        }
    }

    /// One timer tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != PollerState::Running {
            return TickOutcome::Idle;
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("recognition still in flight, skipping tick");
            self.events.publish(SessionEvent::TickSkipped);
            return TickOutcome::Skipped;
        }
        let guard = InFlightGuard(self.in_flight.clone());

        let snapshot = match self.capture.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("snapshot failed: {e}");
                self.events.publish(SessionEvent::SubmissionFailed {
                    error: e.to_string(),
                });
                return TickOutcome::CaptureFailed;
            }
        };

        let api = self.api.clone();
        let display = self.display.clone();
        let events = self.events.clone();
        let announcer = self.announcer.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;

            match api.recognize(&snapshot).await {
                Ok(RecognitionResult::Matched { label, message, .. }) => {
                    info!("recognized: {message}");
                    display.show_recognition(&message);
                    events.publish(SessionEvent::Recognized {
                        label: label.clone(),
                        message,
                    });

                    if let Some(announcer) = announcer {
                        if let Err(e) = announcer.announce(&label).await {
                            debug!("announcement failed: {e}");
                        }
                    }
                }
                Ok(RecognitionResult::NoMatch { message }) => {
                    debug!("no match: {}", message.as_deref().unwrap_or("-"));
                    events.publish(SessionEvent::NoMatch { message });
                }
                Err(e) => {
                    warn!("error recognizing: {e}");
                    events.publish(SessionEvent::SubmissionFailed {
                        error: e.to_string(),
                    });
                }
            }
        });

        TickOutcome::Submitted(handle)
    }

    /// Start, poll until `shutdown` fires, then stop.
    ///
    /// The first tick fires one full interval after start. Ticks missed
    /// while the loop was busy are dropped rather than replayed.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), CoreError> {
        if *shutdown.borrow() {
            return Ok(());
        }

        self.start()?;

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.state != PollerState::Running {
                        break;
                    }
                    // Submission tasks run detached; the guard tracks them
                    let _ = self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeCamera, RecordingDisplay, ScriptedApi};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::Ordering;

    fn matched(label: &str, message: &str) -> Result<RecognitionResult, CoreError> {
        Ok(RecognitionResult::Matched {
            label: label.to_string(),
            message: message.to_string(),
            confidence: None,
        })
    }

    fn poller(
        api: Arc<ScriptedApi>,
    ) -> (
        AttendancePoller,
        Arc<RecordingDisplay>,
        Arc<crate::test_support::CameraCounters>,
    ) {
        let (camera, counters) = FakeCamera::new();
        let display = Arc::new(RecordingDisplay::default());
        let poller = AttendancePoller::new(
            CaptureSource::new(Box::new(camera)),
            api,
            display.clone(),
        );
        (poller, display, counters)
    }

    #[tokio::test]
    async fn start_enters_running() {
        let api = Arc::new(ScriptedApi::new());
        let (mut poller, display, counters) = poller(api);

        assert_eq!(poller.state(), PollerState::Idle);
        poller.start().unwrap();

        assert_eq!(poller.state(), PollerState::Running);
        assert_eq!(display.status(), STATUS_STARTED);
        assert_eq!(display.controls(), ControlState::POLLING);
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn camera_denied_stays_idle() {
        let (camera, _counters) = FakeCamera::denied();
        let display = Arc::new(RecordingDisplay::default());
        let mut poller = AttendancePoller::new(
            CaptureSource::new(Box::new(camera)),
            Arc::new(ScriptedApi::new()),
            display.clone(),
        );

        let err = poller.start().unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied(_)));
        assert_eq!(poller.state(), PollerState::Idle);
        assert_eq!(display.status(), STATUS_CAMERA_ERROR);
        assert_eq!(display.controls(), ControlState::PRE_START);
        assert!(matches!(poller.tick(), TickOutcome::Idle));
    }

    #[tokio::test]
    async fn match_is_shown_in_recognition_panel() {
        let api = Arc::new(ScriptedApi::new());
        api.push_recognize(matched("Bob", "Bob (0.92)"));
        let (mut poller, display, _) = poller(api);
        poller.start().unwrap();

        assert!(!display.recognition_visible());
        match poller.tick() {
            TickOutcome::Submitted(handle) => handle.await.unwrap(),
            other => panic!("expected submission, got {other:?}"),
        }

        assert_eq!(display.recognition().as_deref(), Some("Bob (0.92)"));
        assert!(display.recognition_visible());
    }

    #[tokio::test]
    async fn no_match_and_errors_keep_previous_panel() {
        let api = Arc::new(ScriptedApi::new());
        api.push_recognize(matched("Bob", "Welcome, Bob!"));
        api.push_recognize(Ok(RecognitionResult::NoMatch {
            message: Some("No face detected.".to_string()),
        }));
        api.push_recognize(Err(CoreError::Network("connection reset".to_string())));
        let (poller, display, _) = poller(api.clone());
        let events = SessionEventBus::default();
        let mut rx = events.subscribe();
        let mut poller = poller.with_event_bus(events);
        poller.start().unwrap();

        for _ in 0..3 {
            if let TickOutcome::Submitted(handle) = poller.tick() {
                handle.await.unwrap();
            }
        }

        assert_eq!(display.recognition().as_deref(), Some("Welcome, Bob!"));
        assert_eq!(api.recognize_calls.load(Ordering::SeqCst), 3);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::CameraStarted);
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::Recognized { .. }
        ));
        assert!(matches!(rx.recv().await.unwrap(), SessionEvent::NoMatch { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::SubmissionFailed { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_skip_while_request_in_flight() {
        let api = Arc::new(ScriptedApi::new().with_latency(Duration::from_secs(5)));
        let (mut poller, _display, _) = poller(api.clone());
        poller.start().unwrap();

        let first = match poller.tick() {
            TickOutcome::Submitted(handle) => handle,
            other => panic!("expected submission, got {other:?}"),
        };
        tokio::task::yield_now().await;

        assert!(poller.is_submission_in_flight());
        assert!(matches!(poller.tick(), TickOutcome::Skipped));
        assert!(matches!(poller.tick(), TickOutcome::Skipped));

        first.await.unwrap();
        assert!(!poller.is_submission_in_flight());
        match poller.tick() {
            TickOutcome::Submitted(handle) => handle.await.unwrap(),
            other => panic!("expected submission, got {other:?}"),
        }

        assert_eq!(api.recognize_calls.load(Ordering::SeqCst), 2);
        assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_camera_with_request_in_flight() {
        let api = Arc::new(ScriptedApi::new().with_latency(Duration::from_secs(10)));
        api.push_recognize(matched("Bob", "Welcome, Bob!"));
        let (mut poller, display, counters) = poller(api);
        poller.start().unwrap();

        let pending = match poller.tick() {
            TickOutcome::Submitted(handle) => handle,
            other => panic!("expected submission, got {other:?}"),
        };

        poller.stop();
        assert_eq!(poller.state(), PollerState::Idle);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
        assert_eq!(display.status(), STATUS_STOPPED);
        assert_eq!(display.controls(), ControlState::PRE_START);
        assert!(matches!(poller.tick(), TickOutcome::Idle));

        // Not cancelled: the late answer still lands
        pending.await.unwrap();
        assert_eq!(display.recognition().as_deref(), Some("Welcome, Bob!"));
    }

    #[tokio::test(start_paused = true)]
    async fn run_polls_on_interval_until_shutdown() {
        let api = Arc::new(ScriptedApi::new());
        let (poller, _display, counters) = poller(api.clone());
        let mut poller = poller.with_interval(Duration::from_millis(2_000));
        let (tx, rx) = watch::channel(false);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(7_000)).await;
            tx.send(true).unwrap();
        };
        let (result, _) = tokio::join!(poller.run(rx), stopper);
        result.unwrap();
        tokio::task::yield_now().await;

        // ticks at 2s, 4s, 6s
        assert_eq!(api.recognize_calls.load(Ordering::SeqCst), 3);
        assert_eq!(poller.state(), PollerState::Idle);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped() {
        let api = Arc::new(ScriptedApi::new());
        let (poller, _display, _) = poller(api.clone());
        let mut poller = poller.with_interval(Duration::ZERO);
        assert_eq!(poller.interval(), MIN_POLL_INTERVAL);

        let (tx, rx) = watch::channel(false);
        let stopper = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            tx.send(true).unwrap();
        };
        let (result, _) = tokio::join!(poller.run(rx), stopper);
        result.unwrap();

        assert!(api.recognize_calls.load(Ordering::SeqCst) >= 1);
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn run_never_overlaps_slow_requests() {
        // 4.5s latency against a 2s interval
        let api = Arc::new(ScriptedApi::new().with_latency(Duration::from_millis(4_500)));
        let (poller, _display, _) = poller(api.clone());
        let mut poller = poller.with_interval(Duration::from_millis(2_000));
        let (tx, rx) = watch::channel(false);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(20_500)).await;
            tx.send(true).unwrap();
        };
        let (result, _) = tokio::join!(poller.run(rx), stopper);
        result.unwrap();

        assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(api.recognize_calls.load(Ordering::SeqCst) < 10);
    }

    struct RecordingAnnouncer {
        labels: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Announcer for RecordingAnnouncer {
        async fn announce(&self, label: &str) -> Result<(), CoreError> {
            self.labels.lock().push(label.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn matches_are_announced() {
        let api = Arc::new(ScriptedApi::new());
        api.push_recognize(matched("Alice", "Welcome, Alice!"));
        api.push_recognize(Ok(RecognitionResult::NoMatch { message: None }));
        let announcer = Arc::new(RecordingAnnouncer {
            labels: Mutex::new(Vec::new()),
        });
        let (poller, _display, _) = poller(api);
        let mut poller = poller.with_announcer(announcer.clone());
        poller.start().unwrap();

        for _ in 0..2 {
            if let TickOutcome::Submitted(handle) = poller.tick() {
                handle.await.unwrap();
            }
        }

        assert_eq!(*announcer.labels.lock(), vec!["Alice".to_string()]);
    }
}
