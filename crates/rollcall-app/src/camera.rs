//! Camera device selection from config.

use rollcall_core::config::{CameraConfig, CameraSourceKind};
use rollcall_core::error::CoreError;
use rollcall_core::ports::camera::CameraDevice;
use rollcall_vision::capture::CaptureSource;
use rollcall_vision::still_image::StillImageCamera;

pub fn build_capture_source(config: &CameraConfig) -> Result<CaptureSource, CoreError> {
    let device = build_device(config)?;
    Ok(CaptureSource::new(device).with_jpeg_quality(config.jpeg_quality))
}

fn build_device(config: &CameraConfig) -> Result<Box<dyn CameraDevice>, CoreError> {
    match config.source {
        CameraSourceKind::StillImage => {
            let path = config.still_image_path.clone().ok_or_else(|| {
                CoreError::Config("still_image source needs camera.still_image_path".to_string())
            })?;
            Ok(Box::new(StillImageCamera::new(path)))
        }
        CameraSourceKind::Webcam => webcam(config.device_index),
    }
}

#[cfg(feature = "webcam")]
fn webcam(index: u32) -> Result<Box<dyn CameraDevice>, CoreError> {
    Ok(Box::new(rollcall_vision::webcam::WebcamCamera::new(index)))
}

#[cfg(not(feature = "webcam"))]
fn webcam(index: u32) -> Result<Box<dyn CameraDevice>, CoreError> {
    Err(CoreError::DeviceUnavailable(format!(
        "webcam {index}: built without the `webcam` feature (use --image)"
    )))
}
