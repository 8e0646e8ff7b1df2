//! Capture source.
//!
//! Owns one camera device and the session lifecycle around it:
//! `start` acquires, `snapshot` reads and encodes the current frame,
//! `stop` releases every track.

use chrono::{DateTime, Utc};
use rollcall_core::error::CoreError;
use rollcall_core::models::frame::FrameSnapshot;
use rollcall_core::ports::camera::CameraDevice;
use tracing::{debug, info};

use crate::encoder::{self, DEFAULT_JPEG_QUALITY};

/// Live camera session. At most one per capture source.
#[derive(Debug, Clone, Copy)]
pub struct CameraSession {
    started_at: DateTime<Utc>,
}

impl CameraSession {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

pub struct CaptureSource {
    device: Box<dyn CameraDevice>,
    session: Option<CameraSession>,
    jpeg_quality: u8,
}

impl CaptureSource {
    pub fn new(device: Box<dyn CameraDevice>) -> Self {
        Self {
            device,
            session: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Request camera access.
    ///
    /// No-op when a session is already active. On failure the source
    /// stays inactive.
    pub fn start(&mut self) -> Result<CameraSession, CoreError> {
        if let Some(session) = self.session {
            debug!("camera already active: {}", self.device.describe());
            return Ok(session);
        }

        self.device.open()?;
        let session = CameraSession {
            started_at: Utc::now(),
        };
        self.session = Some(session);
        info!("camera started: {}", self.device.describe());
        Ok(session)
    }

    /// Encode the current frame at the stream's native resolution
    pub fn snapshot(&mut self) -> Result<FrameSnapshot, CoreError> {
        if self.session.is_none() {
            return Err(CoreError::SessionInactive);
        }

        let frame = self.device.read_frame()?;
        encoder::snapshot_from_frame(&frame, self.jpeg_quality)
    }

    /// Release all tracks. Idempotent.
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            self.device.close();
            info!("camera stopped: {}", self.device.describe());
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<CameraSession> {
        self.session
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        self.stop();
    }
}
