//! Wire contract with the pose-feedback endpoint.
//!
//! Request: `POST /api/process_frame` with
//! `{"image": <base64 JPEG, no data-URL prefix>, "mode": <wire name>}`.
//!
//! Response, one of:
//! - `{"feedback": [..], "confidences": [..], "landmarks": [{x,y},..]}`
//! - `{"status": "no_pose_detected"}`
//! - anything else (treated as an unexpected shape)

use serde::{Deserialize, Serialize};

use crate::models::{InferenceResult, Landmark, PostureMode, ResultStatus};

/// Request body for one frame submission.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessFrameRequest {
    /// Base64-encoded JPEG, without a data-URL prefix.
    pub image: String,
    /// Posture mode wire name.
    pub mode: PostureMode,
}

/// Response body as the service sends it. All fields optional so one
/// struct covers every documented shape; the mapping below decides
/// which shape actually arrived.
#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    #[serde(default)]
    feedback: Option<Vec<String>>,
    #[serde(default)]
    confidences: Option<Vec<f64>>,
    #[serde(default)]
    landmarks: Option<Vec<WireLandmark>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireLandmark {
    x: f64,
    y: f64,
}

/// Map a response body to an `InferenceResult`.
///
/// - non-empty `feedback` wins, regardless of other fields;
/// - otherwise `status == "no_pose_detected"` is the no-subject outcome;
/// - everything else (including type mismatches) is an unexpected shape.
pub fn map_response(value: serde_json::Value) -> InferenceResult {
    let wire: WireResponse = match serde_json::from_value(value.clone()) {
        Ok(w) => w,
        Err(_) => return InferenceResult::unexpected_shape(value),
    };

    match wire.feedback {
        Some(feedback) if !feedback.is_empty() => InferenceResult {
            feedback_messages: feedback,
            confidences: wire.confidences.unwrap_or_default(),
            landmarks: wire
                .landmarks
                .unwrap_or_default()
                .into_iter()
                .map(|lm| Landmark::new(lm.x, lm.y))
                .collect(),
            status: ResultStatus::Ok,
            raw: value,
        },
        _ => match wire.status.as_deref() {
            Some("no_pose_detected") => InferenceResult::no_pose(value),
            _ => InferenceResult::unexpected_shape(value),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_wire_shape() {
        let req = ProcessFrameRequest {
            image: "aGVsbG8=".to_string(),
            mode: PostureMode::Squat,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"image": "aGVsbG8=", "mode": "squat"}));
    }

    #[test]
    fn feedback_maps_to_ok() {
        let result = map_response(json!({
            "feedback": ["Straighten your back"],
            "confidences": [0.81],
            "landmarks": [{"x": 0.5, "y": 0.5}],
        }));
        assert_eq!(result.status, ResultStatus::Ok);
        assert_eq!(result.feedback_messages, vec!["Straighten your back"]);
        assert_eq!(result.confidence_for(0), Some(0.81));
        assert_eq!(result.landmarks.len(), 1);
        assert!((result.landmarks[0].x - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn feedback_without_landmarks_maps_to_ok_with_empty() {
        let result = map_response(json!({"feedback": ["Lift your head"]}));
        assert_eq!(result.status, ResultStatus::Ok);
        assert!(result.landmarks.is_empty());
        assert!(result.confidences.is_empty());
    }

    #[test]
    fn confidences_may_be_shorter_than_feedback() {
        let result = map_response(json!({
            "feedback": ["Straighten your back", "Knees are past toes"],
            "confidences": [0.9],
        }));
        assert_eq!(result.confidence_for(0), Some(0.9));
        assert_eq!(result.confidence_for(1), None);
    }

    #[test]
    fn no_pose_detected_maps_to_fixed_message() {
        let result = map_response(json!({"status": "no_pose_detected"}));
        assert_eq!(result.status, ResultStatus::NoPoseDetected);
        assert_eq!(result.feedback_messages, vec!["No pose detected"]);
        assert!(result.landmarks.is_empty());
    }

    #[test]
    fn empty_feedback_is_unexpected() {
        let result = map_response(json!({"feedback": []}));
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(
            result.feedback_messages,
            vec!["Unexpected response from backend"]
        );
    }

    #[test]
    fn unknown_shape_is_unexpected() {
        let result = map_response(json!({"landmarks": "not-a-list"}));
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(
            result.feedback_messages,
            vec!["Unexpected response from backend"]
        );
        // Raw body is preserved for diagnostics.
        assert_eq!(result.raw, json!({"landmarks": "not-a-list"}));
    }
}
