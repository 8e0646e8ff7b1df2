//! # rollcall-vision
//!
//! Camera capture crate.
//! Camera device adapters, the capture session lifecycle and JPEG
//! snapshot encoding.
//!
//! ## Feature Flags
//!
//! - `webcam`: native webcam device (nokhwa)

pub mod capture;
pub mod encoder;
pub mod still_image;
#[cfg(feature = "webcam")]
pub mod webcam;
