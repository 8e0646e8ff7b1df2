//! Recognition and registration wire types.

use serde::{Deserialize, Serialize};

/// `POST /api/recognize` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeRequest {
    /// Snapshot as a data URL
    pub image: String,
}

/// `POST /api/recognize` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Matched identity label ("Unknown" on low-confidence misses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Match distance reported by the backend (lower is closer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// `POST /api/register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Subject the sample is enrolled under
    pub name: String,
    /// Snapshot as a data URL
    pub image: String,
}

/// `POST /api/register` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of one recognition poll. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionResult {
    /// The backend matched a known identity
    Matched {
        /// Identity label
        label: String,
        /// Message to show in the last-recognition panel
        message: String,
        confidence: Option<f64>,
    },
    /// No face, unknown face, or low confidence
    NoMatch { message: Option<String> },
}

impl RecognitionResult {
    pub fn is_match(&self) -> bool {
        matches!(self, RecognitionResult::Matched { .. })
    }
}

impl From<RecognizeResponse> for RecognitionResult {
    fn from(resp: RecognizeResponse) -> Self {
        if !resp.success {
            return RecognitionResult::NoMatch {
                message: resp.message,
            };
        }

        let label = resp.name.unwrap_or_default();
        // Older backends only send `message`
        let message = resp.message.unwrap_or_else(|| label.clone());
        RecognitionResult::Matched {
            label,
            message,
            confidence: resp.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_becomes_match() {
        let resp: RecognizeResponse = serde_json::from_str(
            r#"{"success":true,"name":"Bob","confidence":41.5,"message":"Welcome, Bob!"}"#,
        )
        .unwrap();
        let result = RecognitionResult::from(resp);
        assert_eq!(
            result,
            RecognitionResult::Matched {
                label: "Bob".to_string(),
                message: "Welcome, Bob!".to_string(),
                confidence: Some(41.5),
            }
        );
    }

    #[test]
    fn message_only_success_still_matches() {
        let resp: RecognizeResponse =
            serde_json::from_str(r#"{"success":true,"message":"Bob (0.92)"}"#).unwrap();
        match RecognitionResult::from(resp) {
            RecognitionResult::Matched { message, .. } => assert_eq!(message, "Bob (0.92)"),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn failure_response_becomes_no_match() {
        let resp: RecognizeResponse =
            serde_json::from_str(r#"{"success":false,"message":"No face detected."}"#).unwrap();
        let result = RecognitionResult::from(resp);
        assert!(!result.is_match());
        assert_eq!(
            result,
            RecognitionResult::NoMatch {
                message: Some("No face detected.".to_string())
            }
        );
    }

    #[test]
    fn register_request_shape() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            image: "data:image/jpeg;base64,AAAA".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["image"], "data:image/jpeg;base64,AAAA");
    }
}
