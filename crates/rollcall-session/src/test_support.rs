//! Fakes shared by the session tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_core::error::CoreError;
use rollcall_core::models::attendance::{AttendanceRecord, ModelStats, TrainSummary};
use rollcall_core::models::enrollment::EnrollmentProgress;
use rollcall_core::models::frame::{FrameSnapshot, RgbFrame};
use rollcall_core::models::recognition::RecognitionResult;
use rollcall_core::ports::api_client::RecognitionApi;
use rollcall_core::ports::camera::CameraDevice;
use rollcall_core::ports::display::{ControlState, StatusDisplay};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ------------------------------------------------------------
// Camera
// ------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CameraCounters {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub frames: AtomicUsize,
}

pub struct FakeCamera {
    counters: Arc<CameraCounters>,
    open_error: Option<fn() -> CoreError>,
    open: bool,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<CameraCounters>) {
        let counters = Arc::new(CameraCounters::default());
        (
            Self {
                counters: counters.clone(),
                open_error: None,
                open: false,
            },
            counters,
        )
    }

    pub fn denied() -> (Self, Arc<CameraCounters>) {
        let (mut camera, counters) = Self::new();
        camera.open_error = Some(permission_denied);
        (camera, counters)
    }
}

fn permission_denied() -> CoreError {
    CoreError::PermissionDenied("NotAllowedError".to_string())
}

impl CameraDevice for FakeCamera {
    fn open(&mut self) -> Result<(), CoreError> {
        if let Some(make_error) = self.open_error {
            return Err(make_error());
        }
        self.open = true;
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbFrame, CoreError> {
        if !self.open {
            return Err(CoreError::SessionInactive);
        }
        self.counters.frames.fetch_add(1, Ordering::SeqCst);
        Ok(RgbFrame {
            width: 8,
            height: 6,
            pixels: vec![127; 8 * 6 * 3],
        })
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// ------------------------------------------------------------
// Backend
// ------------------------------------------------------------

/// Answers from a script; falls back to `default_*` once the script runs out.
pub struct ScriptedApi {
    recognize_script: Mutex<VecDeque<Result<RecognitionResult, CoreError>>>,
    register_script: Mutex<VecDeque<Result<(), CoreError>>>,
    default_register_ok: bool,
    latency: Duration,
    pub recognize_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub registered_names: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            recognize_script: Mutex::new(VecDeque::new()),
            register_script: Mutex::new(VecDeque::new()),
            default_register_ok: true,
            latency: Duration::ZERO,
            recognize_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            registered_names: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Register answers `success: false` once the script is exhausted
    pub fn rejecting_by_default(mut self) -> Self {
        self.default_register_ok = false;
        self
    }

    pub fn push_recognize(&self, result: Result<RecognitionResult, CoreError>) {
        self.recognize_script.lock().push_back(result);
    }

    pub fn push_register(&self, result: Result<(), CoreError>) {
        self.register_script.lock().push_back(result);
    }

    async fn simulate_request(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecognitionApi for ScriptedApi {
    async fn recognize(&self, _snapshot: &FrameSnapshot) -> Result<RecognitionResult, CoreError> {
        self.recognize_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_request().await;
        self.recognize_script
            .lock()
            .pop_front()
            .unwrap_or(Ok(RecognitionResult::NoMatch { message: None }))
    }

    async fn register(&self, name: &str, _snapshot: &FrameSnapshot) -> Result<(), CoreError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.registered_names.lock().push(name.to_string());
        self.simulate_request().await;
        let scripted = self.register_script.lock().pop_front();
        scripted.unwrap_or_else(|| {
            if self.default_register_ok {
                Ok(())
            } else {
                Err(CoreError::Rejected("Face not detected or save failed.".to_string()))
            }
        })
    }

    async fn train(&self) -> Result<TrainSummary, CoreError> {
        Ok(TrainSummary {
            message: "Training complete.".to_string(),
        })
    }

    async fn attendance_logs(
        &self,
        _date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, CoreError> {
        Ok(Vec::new())
    }

    async fn model_stats(&self) -> Result<ModelStats, CoreError> {
        Ok(ModelStats {
            total_people: 0,
            total_images: 0,
            last_trained: "Never".to_string(),
        })
    }
}

// ------------------------------------------------------------
// Display
// ------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DisplaySnapshot {
    pub status: String,
    pub controls: ControlState,
    pub recognition: Option<String>,
    pub recognition_visible: bool,
    pub progress: Option<(f64, String)>,
    pub alerts: Vec<String>,
    pub progress_updates: usize,
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    state: Mutex<DisplaySnapshot>,
}

impl RecordingDisplay {
    pub fn status(&self) -> String {
        self.state.lock().status.clone()
    }

    pub fn controls(&self) -> ControlState {
        self.state.lock().controls
    }

    pub fn recognition(&self) -> Option<String> {
        self.state.lock().recognition.clone()
    }

    pub fn recognition_visible(&self) -> bool {
        self.state.lock().recognition_visible
    }

    pub fn progress(&self) -> Option<(f64, String)> {
        self.state.lock().progress.clone()
    }

    pub fn progress_updates(&self) -> usize {
        self.state.lock().progress_updates
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().alerts.clone()
    }
}

impl StatusDisplay for RecordingDisplay {
    fn set_status(&self, text: &str) {
        self.state.lock().status = text.to_string();
    }

    fn set_controls(&self, controls: ControlState) {
        self.state.lock().controls = controls;
    }

    fn show_recognition(&self, message: &str) {
        let mut state = self.state.lock();
        state.recognition = Some(message.to_string());
        state.recognition_visible = true;
    }

    fn show_progress(&self, progress: &EnrollmentProgress) {
        let mut state = self.state.lock();
        state.progress = Some((progress.percent(), progress.label()));
        state.progress_updates += 1;
    }

    fn alert(&self, message: &str) {
        self.state.lock().alerts.push(message.to_string());
    }
}
