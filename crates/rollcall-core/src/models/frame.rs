//! Camera frame models.
//!
//! `RgbFrame` is what a camera device hands over; `FrameSnapshot` is the
//! encoded still that gets submitted to the backend.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// MIME type of every snapshot sent to the backend
pub const SNAPSHOT_MIME: &str = "image/jpeg";

/// Raw RGB8 frame read from a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    /// Native stream width (pixels)
    pub width: u32,
    /// Native stream height (pixels)
    pub height: u32,
    /// Row-major RGB8 pixel data, `width * height * 3` bytes
    pub pixels: Vec<u8>,
}

impl RgbFrame {
    /// Whether the pixel buffer matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 3
    }
}

/// One encoded still taken from the live stream.
///
/// Immutable once captured; cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    jpeg: Arc<[u8]>,
    width: u32,
    height: u32,
    captured_at: DateTime<Utc>,
}

impl FrameSnapshot {
    pub fn new(jpeg: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            jpeg: jpeg.into(),
            width,
            height,
            captured_at: Utc::now(),
        }
    }

    /// Encoded JPEG bytes
    pub fn bytes(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// `data:image/jpeg;base64,...` form expected by the backend
    pub fn to_data_url(&self) -> String {
        format!("data:{SNAPSHOT_MIME};base64,{}", B64.encode(&self.jpeg))
    }
}
