//! Gemini API request and response types.

use serde::{Deserialize, Serialize};

/// A block of text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    pub text: String,
}

/// Content: a list of parts with an optional role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Parts making up this content.
    pub parts: Vec<Part>,
    /// Role ("user" or "model"); omitted for system instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    /// Create user content from text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
            role: Some("user".to_string()),
        }
    }

    /// Create role-less content (system instruction).
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
            role: None,
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Maximum tokens to generate.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// generateContent request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents.
    pub contents: Vec<Content>,
    /// System instruction.
    pub system_instruction: Content,
    /// Generation parameters.
    pub generation_config: GenerationConfig,
}

/// generateContent response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Response candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Extract the first candidate's text, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// A response candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Generated content.
    pub content: Content,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error details.
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error message.
    pub message: String,
}
