//! Still-image camera.
//!
//! Serves one image file as every frame. Used for headless runs and demos
//! where no webcam is attached.

use rollcall_core::error::CoreError;
use rollcall_core::models::frame::RgbFrame;
use rollcall_core::ports::camera::CameraDevice;
use std::path::PathBuf;
use tracing::debug;

use crate::encoder;

pub struct StillImageCamera {
    path: PathBuf,
    frame: Option<RgbFrame>,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }
}

impl CameraDevice for StillImageCamera {
    fn open(&mut self) -> Result<(), CoreError> {
        if !self.path.is_file() {
            return Err(CoreError::DeviceUnavailable(format!(
                "image not found: {}",
                self.path.display()
            )));
        }

        let frame = encoder::load_rgb_frame(&self.path)
            .map_err(|e| CoreError::DeviceUnavailable(e.to_string()))?;
        debug!(
            "still image loaded: {} ({}x{})",
            self.path.display(),
            frame.width,
            frame.height
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbFrame, CoreError> {
        self.frame.clone().ok_or(CoreError::SessionInactive)
    }

    fn close(&mut self) {
        self.frame = None;
    }

    fn describe(&self) -> String {
        format!("still image {}", self.path.display())
    }
}
