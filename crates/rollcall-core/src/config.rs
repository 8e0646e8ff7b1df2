//! Application configuration.
//!
//! Backend URL, camera source, loop timings and match announcement
//! settings. Loaded from a JSON file by `ConfigManager`; CLI flags override
//! individual fields.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::enrollment::TOTAL_IMAGES;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection
    pub server: ServerConfig,
    /// Camera source and encoding
    #[serde(default)]
    pub camera: CameraConfig,
    /// Attendance polling
    #[serde(default)]
    pub attendance: AttendanceConfig,
    /// Enrollment runs
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
    /// Match announcements
    #[serde(default)]
    pub notification: NotificationConfig,
}

// ============================================================
// Server
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend base URL (e.g. "http://localhost:5000")
    pub base_url: String,
    /// Request timeout (ms)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries for admin calls (train/logs/stats). Capture calls never retry.
    #[serde(default = "default_admin_max_retries")]
    pub admin_max_retries: u32,
}

// ============================================================
// Camera
// ============================================================

/// Where frames come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSourceKind {
    /// Native webcam (requires the `webcam` feature)
    #[default]
    Webcam,
    /// A fixed image file served as every frame
    StillImage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub source: CameraSourceKind,
    /// Webcam index
    #[serde(default)]
    pub device_index: u32,
    /// Image file for `StillImage`
    #[serde(default)]
    pub still_image_path: Option<PathBuf>,
    /// JPEG quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSourceKind::default(),
            device_index: 0,
            still_image_path: None,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

// ============================================================
// Attendance / Enrollment
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Recognition poll interval (ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    /// Accepted samples per run
    #[serde(default = "default_total_images")]
    pub total_images: u32,
    /// Delay between a settled submission and the next capture (ms)
    #[serde(default = "default_capture_delay_ms")]
    pub capture_delay_ms: u64,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            total_images: default_total_images(),
            capture_delay_ms: default_capture_delay_ms(),
        }
    }
}

// ============================================================
// Notification
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Announce recognized names
    #[serde(default)]
    pub announce_matches: bool,
    /// Text-to-speech program; the label is passed as the last argument
    #[serde(default = "default_announce_command")]
    pub announce_command: Vec<String>,
    /// Same label is not announced again within this window (secs)
    #[serde(default = "default_announce_cooldown_secs")]
    pub announce_cooldown_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            announce_matches: false,
            announce_command: default_announce_command(),
            announce_cooldown_secs: default_announce_cooldown_secs(),
        }
    }
}

impl NotificationConfig {
    pub fn announce_cooldown(&self) -> Duration {
        Duration::from_secs(self.announce_cooldown_secs)
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_admin_max_retries() -> u32 {
    3
}

fn default_jpeg_quality() -> u8 {
    92
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_total_images() -> u32 {
    TOTAL_IMAGES
}

fn default_capture_delay_ms() -> u64 {
    100
}

fn default_announce_command() -> Vec<String> {
    vec!["espeak".to_string()]
}

fn default_announce_cooldown_secs() -> u64 {
    30
}

impl AppConfig {
    /// Default configuration
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:5000".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
                admin_max_retries: default_admin_max_retries(),
            },
            camera: CameraConfig::default(),
            attendance: AttendanceConfig::default(),
            enrollment: EnrollmentConfig::default(),
            notification: NotificationConfig::default(),
        }
    }

    /// Reject values the session loops cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.server.base_url.trim().is_empty() {
            return Err(invalid("server.base_url", "must not be empty"));
        }
        if self.attendance.poll_interval_ms == 0 {
            return Err(invalid("attendance.poll_interval_ms", "must be > 0"));
        }
        if self.enrollment.total_images == 0 {
            return Err(invalid("enrollment.total_images", "must be > 0"));
        }
        if !(1..=100).contains(&self.camera.jpeg_quality) {
            return Err(invalid("camera.jpeg_quality", "must be within 1..=100"));
        }
        if self.camera.source == CameraSourceKind::StillImage
            && self.camera.still_image_path.is_none()
        {
            return Err(invalid(
                "camera.still_image_path",
                "required for the still_image source",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.attendance.poll_interval_ms)
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.enrollment.capture_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
