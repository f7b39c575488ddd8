//! Gemini-backed prompt author for Jot.
//!
//! Turns a day's calendar events into a single reflective journal question
//! plus a short day title. Treated as unreliable and optional by the prompt
//! chain: any error here just moves generation down a tier.

pub mod api_types;
pub mod brain;
pub mod config;
pub mod error;

pub use brain::GeminiBrain;
pub use config::GeminiConfig;
pub use error::BrainError;
