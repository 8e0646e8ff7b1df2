//! HTTP recognition client.
//!
//! `RecognitionApi` port implementation. Capture-path calls (recognize,
//! register) are single-shot; read-only admin calls retry with backoff.

use async_trait::async_trait;
use reqwest::StatusCode;
use rollcall_core::error::CoreError;
use rollcall_core::models::attendance::{AttendanceRecord, ModelStats, TrainSummary};
use rollcall_core::models::frame::FrameSnapshot;
use rollcall_core::models::recognition::{
    RecognitionResult, RecognizeRequest, RecognizeResponse, RegisterRequest, RegisterResponse,
};
use rollcall_core::ports::api_client::RecognitionApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default retry count for admin calls
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fallback when a 429 carries no usable Retry-After
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const RECOGNIZE_PATH: &str = "/api/recognize";
const REGISTER_PATH: &str = "/api/register";
const TRAIN_PATH: &str = "/api/train";
const LOGS_PATH: &str = "/api/logs";
const STATS_PATH: &str = "/api/stats";

fn is_retryable(error: &CoreError) -> bool {
    matches!(
        error,
        CoreError::Network(_) | CoreError::ServiceUnavailable(_) | CoreError::RateLimit { .. }
    )
}

/// Map a non-success status to an error
fn status_error(status: StatusCode, retry_after: Option<u64>, text: String) -> CoreError {
    match status.as_u16() {
        404 => CoreError::NotFound {
            resource_type: "API".to_string(),
            id: text,
        },
        429 => CoreError::RateLimit {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        503 => CoreError::ServiceUnavailable(text),
        _ => CoreError::Internal(format!("API error ({status}): {text}")),
    }
}

fn retry_after_secs(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// REST client for the recognition backend
pub struct HttpRecognitionClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpRecognitionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Retry count for admin calls
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let retry_after = retry_after_secs(&resp);
        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("failed to read response body: {e}");
            String::new()
        });

        Err(status_error(status, retry_after, text))
    }

    /// POST on the capture path.
    ///
    /// The backend reports rejections as 4xx/5xx with a JSON body, so the
    /// body is parsed first and the status only matters when it isn't the
    /// expected shape.
    async fn post_capture<B, R>(&self, path: &str, body: &B) -> Result<R, CoreError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{path} request failed: {e}")))?;

        let status = resp.status();
        let retry_after = retry_after_secs(&resp);
        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("{path} body read failed: {e}")))?;

        match serde_json::from_str::<R>(&text) {
            Ok(parsed) => {
                if !status.is_success() {
                    debug!("{path} answered {status} with a well-formed body");
                }
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(CoreError::Internal(format!(
                "{path} response parse failed: {e}"
            ))),
            Err(_) => Err(status_error(status, retry_after, text)),
        }
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, CoreError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("GET {url} failed: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| CoreError::Internal(format!("GET {url} response parse failed: {e}")))
    }

    /// Run `operation` with exponential backoff: 1s → 2s → 4s
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut last_error = CoreError::Internal("request failed".to_string());
        let mut delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable(&e) || attempt == self.max_retries {
                        return Err(e);
                    }

                    warn!(
                        "request failed (attempt {}/{}): {e}, retrying in {delay:?}",
                        attempt + 1,
                        self.max_retries + 1
                    );

                    if let CoreError::RateLimit { retry_after_secs } = &e {
                        delay = Duration::from_secs(*retry_after_secs);
                    }

                    last_error = e;
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(30));
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl RecognitionApi for HttpRecognitionClient {
    async fn recognize(&self, snapshot: &FrameSnapshot) -> Result<RecognitionResult, CoreError> {
        debug!(
            "recognize: {}x{} snapshot, {} bytes",
            snapshot.width(),
            snapshot.height(),
            snapshot.bytes().len()
        );

        let body = RecognizeRequest {
            image: snapshot.to_data_url(),
        };
        let resp: RecognizeResponse = self.post_capture(RECOGNIZE_PATH, &body).await?;
        Ok(RecognitionResult::from(resp))
    }

    async fn register(&self, name: &str, snapshot: &FrameSnapshot) -> Result<(), CoreError> {
        debug!("register: name={name}, {} bytes", snapshot.bytes().len());

        let body = RegisterRequest {
            name: name.to_string(),
            image: snapshot.to_data_url(),
        };
        let resp: RegisterResponse = self.post_capture(REGISTER_PATH, &body).await?;

        if resp.success {
            Ok(())
        } else {
            Err(CoreError::Rejected(resp.message.unwrap_or_else(|| {
                "face not detected or save failed".to_string()
            })))
        }
    }

    async fn train(&self) -> Result<TrainSummary, CoreError> {
        debug!("train request");

        let resp = self
            .client
            .post(self.url(TRAIN_PATH))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("train request failed: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.json::<TrainSummary>()
            .await
            .map_err(|e| CoreError::Internal(format!("train response parse failed: {e}")))
    }

    async fn attendance_logs(
        &self,
        date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, CoreError> {
        let mut url = url::Url::parse(&self.url(LOGS_PATH))
            .map_err(|e| CoreError::Config(format!("invalid server URL: {e}")))?;
        if let Some(date) = date {
            url.query_pairs_mut().append_pair("date", date);
        }
        debug!("attendance logs: {url}");

        self.execute_with_retry(|| self.get_json::<Vec<AttendanceRecord>>(url.as_str()))
            .await
    }

    async fn model_stats(&self) -> Result<ModelStats, CoreError> {
        let url = self.url(STATS_PATH);
        self.execute_with_retry(|| self.get_json::<ModelStats>(&url))
            .await
    }
}
