//! Configuration for GeminiBrain.

use std::env;

use crate::error::BrainError;

/// Configuration for GeminiBrain.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for the response.
    pub max_output_tokens: u32,

    /// Temperature for generation.
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash-lite".to_string(),
            max_output_tokens: 120,
            temperature: 1.0,
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API base URL (default: Google's)
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.5-flash-lite)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max response tokens (default: 120)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 1.0)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| BrainError::Configuration("GEMINI_API_KEY is required".to_string()))?;

        let mut config = Self {
            api_key,
            ..Default::default()
        };

        if let Ok(url) = env::var("GEMINI_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(max) = env::var("GEMINI_MAX_OUTPUT_TOKENS") {
            config.max_output_tokens = max.parse().map_err(|_| {
                BrainError::Configuration("GEMINI_MAX_OUTPUT_TOKENS must be a number".to_string())
            })?;
        }
        if let Ok(temp) = env::var("GEMINI_TEMPERATURE") {
            config.temperature = temp.parse().map_err(|_| {
                BrainError::Configuration("GEMINI_TEMPERATURE must be a number".to_string())
            })?;
        }

        Ok(config)
    }

    /// Whether the generator is configured in the environment.
    pub fn is_configured() -> bool {
        env::var("GEMINI_API_KEY").is_ok()
    }

    /// URL for the generateContent endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}
