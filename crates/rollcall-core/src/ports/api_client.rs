//! Recognition backend client port.
//!
//! Implementation: `rollcall-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::attendance::{AttendanceRecord, ModelStats, TrainSummary};
use crate::models::frame::FrameSnapshot;
use crate::models::recognition::RecognitionResult;

/// Recognition/registration API
#[async_trait]
pub trait RecognitionApi: Send + Sync {
    /// Submit one snapshot for recognition.
    ///
    /// `success: false` answers are `Ok(RecognitionResult::NoMatch)`;
    /// only transport-level failures are errors.
    async fn recognize(&self, snapshot: &FrameSnapshot) -> Result<RecognitionResult, CoreError>;

    /// Submit one enrollment sample tagged with `name`.
    ///
    /// A `success: false` answer is `Err(CoreError::Rejected)`.
    async fn register(&self, name: &str, snapshot: &FrameSnapshot) -> Result<(), CoreError>;

    /// Retrain the backend model from the enrolled samples
    async fn train(&self) -> Result<TrainSummary, CoreError>;

    /// Attendance log for `date` (`YYYY-MM-DD`), today when `None`
    async fn attendance_logs(&self, date: Option<&str>)
        -> Result<Vec<AttendanceRecord>, CoreError>;

    /// Dataset and model statistics
    async fn model_stats(&self) -> Result<ModelStats, CoreError>;
}
