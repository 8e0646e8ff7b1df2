//! Camera device port.
//!
//! Implementation: `rollcall-vision` crate (still image file, nokhwa webcam)

use crate::error::CoreError;
use crate::models::frame::RgbFrame;

/// A video source that can be opened, read frame by frame, and released.
///
/// Calls are synchronous: a frame read returns the most recent frame of an
/// already running stream. Not required to be `Send`, since some native
/// camera handles are bound to the thread that opened them.
pub trait CameraDevice {
    /// Acquire the device and start streaming.
    ///
    /// Fails with `PermissionDenied` or `DeviceUnavailable`.
    fn open(&mut self) -> Result<(), CoreError>;

    /// Current frame at the stream's native resolution
    fn read_frame(&mut self) -> Result<RgbFrame, CoreError>;

    /// Release every track held by the device. Must be idempotent.
    fn close(&mut self);

    /// Human-readable device description for logs
    fn describe(&self) -> String {
        "camera".to_string()
    }
}
