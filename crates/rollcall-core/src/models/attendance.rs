//! Attendance log and model statistics read models.
//!
//! Returned by the backend's admin endpoints (`/api/logs`, `/api/stats`,
//! `/api/train`).

use serde::{Deserialize, Serialize};

/// One ranked candidate from a recognition pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub name: String,
    pub distance: f64,
}

/// One attendance log row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub name: String,
    /// Time of day the entry was logged (`HH:MM:SS`)
    pub timestamp: String,
    /// Formatted distance, or `"N/A"` for legacy rows
    pub confidence: String,
    #[serde(default)]
    pub details: Vec<CandidateMatch>,
}

/// Dataset and model statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub total_people: u64,
    pub total_images: u64,
    /// `"Never"` until the model has been trained
    pub last_trained: String,
}

/// `POST /api/train` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub message: String,
}
