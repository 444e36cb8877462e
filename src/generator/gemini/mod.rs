//! Question generation through the Gemini `generateContent` API.

mod client;
mod config;
mod error;
mod models;
mod prompt;

pub use client::GeminiGenerator;
pub use config::GeminiConfig;
pub use error::{GeminiError, GeminiResult};
