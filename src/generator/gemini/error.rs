//! Error types for the Gemini question generator.

use reqwest::StatusCode;
use thiserror::Error;

use crate::generator::GeneratorError;

/// Convenient result alias returning [`GeminiError`] failures.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Failures that can occur while talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Required environment variable is missing.
    #[error("missing Gemini environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Gemini client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent.
    #[error("failed to send request to Gemini model `{model}`")]
    RequestSend {
        /// Model the request targeted.
        model: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// Gemini answered with a non-success status.
    #[error("unexpected Gemini response status {status}: {body}")]
    RequestStatus {
        /// HTTP status returned.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
    /// Response envelope could not be parsed.
    #[error("failed to decode Gemini response")]
    DecodeResponse {
        /// Body decoding failure.
        #[source]
        source: reqwest::Error,
    },
    /// The response carried no text candidate.
    #[error("Gemini response contained no text")]
    EmptyResponse,
    /// The generated text was not the expected question array.
    #[error("failed to deserialize generated questions")]
    DeserializeQuestions {
        /// JSON error on the model's text.
        #[source]
        source: serde_json::Error,
    },
}

impl From<GeminiError> for GeneratorError {
    fn from(err: GeminiError) -> Self {
        GeneratorError::unavailable(err.to_string(), err)
    }
}
