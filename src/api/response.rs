//! Backend response models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Label used when the backend omits one
pub const FALLBACK_LABEL: &str = "neutral";

/// Raw `/audio/predict` and `/face/predict` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Top emotion label
    #[serde(default)]
    pub emotion: Option<String>,
    /// Confidence of the top label
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Score per emotion class
    #[serde(default)]
    pub all_emotions: Option<HashMap<String, f32>>,
    /// Failure reported in a successful HTTP response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One class and its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    /// Emotion label
    pub label: String,
    /// Score in [0, 1]
    pub score: f32,
}

/// Prediction ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPrediction {
    /// Top emotion label
    pub label: String,
    /// Confidence of `label`
    pub confidence: f32,
    /// All classes, highest score first
    pub top_k: Vec<ClassScore>,
    /// Round-trip time of the request in milliseconds
    pub latency_ms: u64,
}

impl PredictionResponse {
    /// Parse a JSON body
    pub fn from_json(body: &str) -> Result<Self, AudioError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Convert into a ranked prediction
    ///
    /// Missing label falls back to `"neutral"`, missing confidence to 0.
    /// Without a score map, `top_k` holds just the label.
    ///
    /// # Errors
    ///
    /// `NetworkError` if the body carries an `error` field.
    pub fn into_prediction(self, latency_ms: u64) -> Result<EmotionPrediction, AudioError> {
        if let Some(message) = self.error {
            log::warn!("Backend reported an error: {}", message);
            return Err(AudioError::NetworkError {
                status: None,
                message,
            });
        }

        let label = self.emotion.unwrap_or_else(|| FALLBACK_LABEL.to_string());
        let confidence = self.confidence.unwrap_or(0.0);

        let top_k = match self.all_emotions {
            Some(scores) => {
                let mut ranked: Vec<ClassScore> = scores
                    .into_iter()
                    .map(|(label, score)| ClassScore { label, score })
                    .collect();
                ranked.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.label.cmp(&b.label))
                });
                ranked
            }
            None => vec![ClassScore {
                label: label.clone(),
                score: confidence,
            }],
        };

        Ok(EmotionPrediction {
            label,
            confidence,
            top_k,
            latency_ms,
        })
    }
}

/// Face bounding box in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceLocation {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl FaceLocation {
    /// Box width, zero if inverted
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    /// Box height, zero if inverted
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }
}

/// A detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Index of the face in the image
    pub face_id: u32,
    /// Bounding box
    pub location: FaceLocation,
    /// Base64 JPEG crop, when requested with `include_cropped=true`
    #[serde(default)]
    pub cropped_face_base64: Option<String>,
}

/// `/face/detect` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetectResponse {
    /// Detected faces
    pub faces: Vec<DetectedFace>,
    /// Number of faces
    pub total_faces: u32,
    /// Source image width
    pub image_width: u32,
    /// Source image height
    pub image_height: u32,
}

/// One location or several, as the backend returns either
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceLocations {
    /// Single face
    One(FaceLocation),
    /// Several faces
    Many(Vec<FaceLocation>),
}

/// `/face/predict` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacePredictResponse {
    /// Emotion scores
    #[serde(flatten)]
    pub prediction: PredictionResponse,
    /// Location(s) of the scored face(s)
    #[serde(default)]
    pub face_location: Option<FaceLocations>,
    /// Public URL of the annotated image
    #[serde(default)]
    pub result_url: Option<String>,
    /// Server-side path of the annotated image, sent when no URL is available
    #[serde(default)]
    pub result_image: Option<String>,
}

impl FacePredictResponse {
    /// Parse a JSON body
    pub fn from_json(body: &str) -> Result<Self, AudioError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Where the annotated image can be fetched, preferring the public URL
    pub fn annotated_image(&self) -> Option<&str> {
        self.result_url.as_deref().or(self.result_image.as_deref())
    }
}

/// `/face/predict-batch` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceBatchPredictResponse {
    /// One result per uploaded crop, in upload order
    pub results: Vec<FacePredictResponse>,
}

/// Per-modality scores behind a fused result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalityScores {
    /// Transcript sentiment score
    #[serde(default)]
    pub text: Option<f32>,
    /// Speech emotion score
    #[serde(default)]
    pub audio: Option<f32>,
    /// Facial emotion score
    #[serde(default)]
    pub vision: Option<f32>,
}

/// A label with its score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    /// Predicted label
    pub label: String,
    /// Score of `label`
    pub score: f32,
    /// Contribution of each modality, present on fused scores
    #[serde(default)]
    pub by_modality: Option<ModalityScores>,
}

/// Scores at one point of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    /// Position in seconds
    pub t: f64,
    /// Transcript model
    #[serde(default)]
    pub text: Option<ModelScore>,
    /// Audio model
    #[serde(default)]
    pub audio: Option<ModelScore>,
    /// Vision model
    #[serde(default)]
    pub vision: Option<ModelScore>,
    /// Fusion of the above
    #[serde(default)]
    pub fused: Option<ModelScore>,
}

/// `/api/analyze/video` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeVideoResponse {
    /// Scores over time, in playback order
    #[serde(default)]
    pub timeline: Vec<TimelineItem>,
    /// Fused result for the whole video
    #[serde(default)]
    pub overall: Option<ModelScore>,
    /// Speech transcript, when one was produced
    #[serde(default)]
    pub transcript: Option<String>,
}

impl AnalyzeVideoResponse {
    /// Parse a JSON body
    pub fn from_json(body: &str) -> Result<Self, AudioError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Fused score per timeline point, 0 where fusion is missing
    pub fn fused_series(&self) -> Vec<f32> {
        self.timeline
            .iter()
            .map(|item| item.fused.as_ref().map_or(0.0, |f| f.score))
            .collect()
    }
}

impl FaceDetectResponse {
    /// Parse a JSON body
    pub fn from_json(body: &str) -> Result<Self, AudioError> {
        Ok(serde_json::from_str(body)?)
    }
}

impl FaceBatchPredictResponse {
    /// Parse a JSON body
    pub fn from_json(body: &str) -> Result<Self, AudioError> {
        Ok(serde_json::from_str(body)?)
    }
}
