//! Backend contract
//!
//! Endpoints, multipart parts and JSON models for the inference backend. The
//! transport itself is left to the caller.

pub mod endpoints;
pub mod response;

pub use endpoints::{check_status, AudioSource, Endpoint, UploadPart};
pub use response::{
    AnalyzeVideoResponse, ClassScore, EmotionPrediction, FacePredictResponse, ModelScore,
    PredictionResponse, TimelineItem,
};
