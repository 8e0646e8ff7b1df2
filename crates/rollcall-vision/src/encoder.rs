//! JPEG snapshot encoder.
//!
//! Frames are encoded at their native resolution; no resizing happens on
//! the capture path.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use rollcall_core::error::CoreError;
use rollcall_core::models::frame::{FrameSnapshot, RgbFrame};
use std::path::Path;
use tracing::debug;

/// Browser default for `image/jpeg` data URLs (0.92)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Encode an RGB8 frame as JPEG
pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, CoreError> {
    if !frame.is_well_formed() {
        return Err(CoreError::Encoding(format!(
            "frame buffer does not match {}x{} RGB8 ({} bytes)",
            frame.width,
            frame.height,
            frame.pixels.len()
        )));
    }

    let quality = quality.clamp(1, 100);
    let mut buf = Vec::with_capacity(frame.pixels.len() / 8);
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(
            &frame.pixels,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CoreError::Encoding(format!("JPEG encode failed: {e}")))?;

    debug!(
        "JPEG encode: {}x{} → {} bytes (quality {})",
        frame.width,
        frame.height,
        buf.len(),
        quality
    );

    Ok(buf)
}

/// Encode a frame into a submission-ready snapshot
pub fn snapshot_from_frame(frame: &RgbFrame, quality: u8) -> Result<FrameSnapshot, CoreError> {
    let jpeg = encode_jpeg(frame, quality)?;
    Ok(FrameSnapshot::new(jpeg, frame.width, frame.height))
}

/// Decode any supported image file into an RGB8 frame
pub fn load_rgb_frame(path: &Path) -> Result<RgbFrame, CoreError> {
    let image = image::open(path)
        .map_err(|e| CoreError::Encoding(format!("failed to decode {}: {e}", path.display())))?;
    Ok(frame_from_image(image.to_rgb8()))
}

pub(crate) fn frame_from_image(image: RgbImage) -> RgbFrame {
    let (width, height) = image.dimensions();
    RgbFrame {
        width,
        height,
        pixels: image.into_raw(),
    }
}
