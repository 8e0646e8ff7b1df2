//! Enrollment progress counter.

use serde::{Deserialize, Serialize};

/// Default number of accepted samples per enrollment run
pub const TOTAL_IMAGES: u32 = 50;

/// Accepted-sample counter for one enrollment run.
///
/// Invariant: `0 <= captured <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentProgress {
    captured: u32,
    total: u32,
}

impl EnrollmentProgress {
    /// `total` of zero is clamped to one
    pub fn new(total: u32) -> Self {
        Self {
            captured: 0,
            total: total.max(1),
        }
    }

    pub fn captured(&self) -> u32 {
        self.captured
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn reset(&mut self) {
        self.captured = 0;
    }

    /// Count one accepted sample. Saturates at `total`.
    pub fn record_success(&mut self) -> u32 {
        if self.captured < self.total {
            self.captured += 1;
        }
        self.captured
    }

    pub fn is_complete(&self) -> bool {
        self.captured >= self.total
    }

    /// Progress bar width, 0.0–100.0
    pub fn percent(&self) -> f64 {
        (self.captured as f64 / self.total as f64) * 100.0
    }

    /// Progress bar label, e.g. `"12/50"`
    pub fn label(&self) -> String {
        format!("{}/{}", self.captured, self.total)
    }
}

impl Default for EnrollmentProgress {
    fn default() -> Self {
        Self::new(TOTAL_IMAGES)
    }
}
