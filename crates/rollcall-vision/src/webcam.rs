//! Native webcam via nokhwa.
//!
//! Enabled with the `webcam` feature.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};
use rollcall_core::error::CoreError;
use rollcall_core::models::frame::RgbFrame;
use rollcall_core::ports::camera::CameraDevice;
use tracing::{debug, warn};

pub struct WebcamCamera {
    index: u32,
    camera: Option<Camera>,
}

impl WebcamCamera {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            camera: None,
        }
    }
}

/// nokhwa reports permission problems only through its messages
fn map_open_error(err: NokhwaError) -> CoreError {
    let text = err.to_string();
    let lower = text.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        CoreError::PermissionDenied(text)
    } else {
        CoreError::DeviceUnavailable(text)
    }
}

impl CameraDevice for WebcamCamera {
    fn open(&mut self) -> Result<(), CoreError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera =
            Camera::new(CameraIndex::Index(self.index), requested).map_err(map_open_error)?;
        camera.open_stream().map_err(map_open_error)?;

        debug!("webcam {} streaming", self.index);
        self.camera = Some(camera);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbFrame, CoreError> {
        let camera = self.camera.as_mut().ok_or(CoreError::SessionInactive)?;
        let buffer = camera
            .frame()
            .map_err(|e| CoreError::DeviceUnavailable(format!("frame read failed: {e}")))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CoreError::Encoding(format!("frame decode failed: {e}")))?;

        let (width, height) = (decoded.width(), decoded.height());
        Ok(RgbFrame {
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("webcam {} stop failed: {e}", self.index);
            }
        }
    }

    fn describe(&self) -> String {
        format!("webcam #{}", self.index)
    }
}

impl Drop for WebcamCamera {
    fn drop(&mut self) {
        self.close();
    }
}
