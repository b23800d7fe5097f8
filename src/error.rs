//! Error types for audio preparation and backend calls

use std::fmt;

/// Errors that can occur while preparing audio or talking to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Invalid input parameters (empty input, zero sample rate, ...)
    InvalidInput(String),

    /// Container or codec is unsupported or the stream is corrupt
    DecodingError(String),

    /// Channel count the normalizer cannot downmix (only mono and stereo are handled)
    UnsupportedChannelLayout(usize),

    /// Input is larger than the configured upload limit
    SizeLimitExceeded {
        /// Input size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Microphone/camera is busy, denied, or unavailable
    DeviceAccessError(String),

    /// Backend unreachable or answered with a non-2xx status
    NetworkError {
        /// HTTP status, if a response was received
        status: Option<u16>,
        /// Response body or transport message
        message: String,
    },

    /// Malformed WAV header or response body
    ParseError(String),
}

impl AudioError {
    /// Whether the user should be offered a retry for this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AudioError::DeviceAccessError(_) | AudioError::NetworkError { .. }
        )
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AudioError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AudioError::UnsupportedChannelLayout(n) => {
                write!(f, "Unsupported channel layout: {} channels (expected 1 or 2)", n)
            }
            AudioError::SizeLimitExceeded { size, limit } => {
                write!(f, "Input too large: {} bytes (limit {} bytes)", size, limit)
            }
            AudioError::DeviceAccessError(msg) => write!(f, "Device access error: {}", msg),
            AudioError::NetworkError { status: Some(status), message } => {
                write!(f, "Network error: HTTP {} {}", status, message)
            }
            AudioError::NetworkError { status: None, message } => {
                write!(f, "Network error: {}", message)
            }
            AudioError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

impl From<serde_json::Error> for AudioError {
    fn from(err: serde_json::Error) -> Self {
        AudioError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AudioError::SizeLimitExceeded { size: 10, limit: 5 };
        assert_eq!(err.to_string(), "Input too large: 10 bytes (limit 5 bytes)");

        let err = AudioError::NetworkError {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Network error: HTTP 502 bad gateway");
    }

    #[test]
    fn test_retryable() {
        assert!(AudioError::DeviceAccessError("busy".into()).is_retryable());
        assert!(!AudioError::DecodingError("corrupt".into()).is_retryable());
        assert!(!AudioError::UnsupportedChannelLayout(6).is_retryable());
    }
}
