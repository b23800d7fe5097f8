//! Configuration parameters for normalization, sample generation and the backend

use serde::{Deserialize, Serialize};

/// Default upload limit: 50 MiB
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable overriding [`ApiConfig::base_url`]
pub const API_BASE_ENV: &str = "AFFECT_API_BASE";

/// Audio normalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Inputs larger than this are rejected before decoding (default: 50 MiB)
    pub max_input_bytes: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Synthetic sine sample parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineConfig {
    /// Duration in seconds (default: 1.0)
    pub duration_secs: f64,

    /// Tone frequency in Hz (default: 440.0, A4)
    pub frequency_hz: f64,

    /// Output sample rate in Hz (default: 16000)
    pub sample_rate: u32,

    /// Peak amplitude in [0.0, 1.0] (default: 0.4)
    pub amplitude: f64,
}

impl Default for SineConfig {
    fn default() -> Self {
        Self {
            duration_secs: 1.0,
            frequency_hz: 440.0,
            sample_rate: 16_000,
            amplitude: 0.4,
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the inference backend (default: `http://localhost:8000`)
    pub base_url: String,
}

impl ApiConfig {
    /// Build from the environment, falling back to the default base URL
    ///
    /// Reads `AFFECT_API_BASE`; blank values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_BASE_ENV) {
            Some(base) if !base.trim().is_empty() => Self {
                base_url: base.trim().to_string(),
            },
            _ => Self::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(NormalizerConfig::default().max_input_bytes, 52_428_800);
        let sine = SineConfig::default();
        assert_eq!(sine.sample_rate, 16_000);
        assert_eq!(sine.frequency_hz, 440.0);
        assert_eq!(ApiConfig::default().base_url, "http://localhost:8000");
    }

    #[test]
    fn test_api_base_override() {
        let config = ApiConfig::from_lookup(|_| Some(" https://api.example.org ".to_string()));
        assert_eq!(config.base_url, "https://api.example.org");

        let config = ApiConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, ApiConfig::default());

        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let config: NormalizerConfig =
            serde_json::from_str(r#"{"max_input_bytes": 1024}"#).unwrap();
        assert_eq!(config.max_input_bytes, 1024);
    }
}
