//! Backend endpoints and multipart upload parts

use url::form_urlencoded;

use crate::error::AudioError;
use crate::io::wav::WavBytes;

/// Inference endpoints exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Speech emotion from a WAV upload
    AudioPredict,
    /// Face bounding boxes from an image
    FaceDetect,
    /// Emotion of a single (optionally pre-cropped) face
    FacePredict,
    /// Emotions of several cropped faces
    FacePredictBatch,
    /// Fused audio/visual timeline for a video
    AnalyzeVideo,
}

impl Endpoint {
    /// Path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::AudioPredict => "/audio/predict",
            Endpoint::FaceDetect => "/face/detect",
            Endpoint::FacePredict => "/face/predict",
            Endpoint::FacePredictBatch => "/face/predict-batch",
            Endpoint::AnalyzeVideo => "/api/analyze/video",
        }
    }

    /// Absolute URL under `base`, without doubled slashes
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }

    /// Absolute URL with query parameters appended
    ///
    /// Keys and values are form-urlencoded.
    pub fn url_with_query(&self, base: &str, query: &[(&str, &str)]) -> String {
        let mut url = self.url(base);
        if query.is_empty() {
            return url;
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        url.push('?');
        url.push_str(&encoded);
        url
    }
}

/// Where an audio upload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource {
    /// A file picked by the user
    File,
    /// A microphone recording
    Recording,
}

/// One file field of a multipart/form-data request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// Form field name
    pub field: String,
    /// File name sent with the part
    pub file_name: String,
    /// Part content type
    pub content_type: String,
    /// Part payload
    pub body: Vec<u8>,
}

impl UploadPart {
    /// The `file` part for `/audio/predict`
    pub fn audio(wav: WavBytes, source: AudioSource) -> Self {
        let file_name = match source {
            AudioSource::File => "audio.wav",
            AudioSource::Recording => "recorded_audio.wav",
        };
        Self {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: "audio/wav".to_string(),
            body: wav.into_bytes(),
        }
    }

    /// The `file` part for `/face/detect` and `/face/predict`
    pub fn image(jpeg: Vec<u8>, file_name: &str) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: "image/jpeg".to_string(),
            body: jpeg,
        }
    }

    /// The `files` parts for `/face/predict-batch`
    pub fn face_batch(crops: Vec<Vec<u8>>) -> Vec<Self> {
        crops
            .into_iter()
            .enumerate()
            .map(|(i, body)| Self {
                field: "files".to_string(),
                file_name: format!("cropped_face_{}.jpg", i),
                content_type: "image/jpeg".to_string(),
                body,
            })
            .collect()
    }
}

/// Map an HTTP status to `Ok` or a `NetworkError` carrying the body
pub fn check_status(status: u16, body: &str) -> Result<(), AudioError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    log::warn!("Backend answered HTTP {}", status);
    Err(AudioError::NetworkError {
        status: Some(status),
        message: body.trim().to_string(),
    })
}
