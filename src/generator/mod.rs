//! Question generation collaborator.
//!
//! The quiz never calls out to a model directly; services go through
//! [`QuestionGenerator`] so that tests can plug in a stub and the server can
//! run without any generator at all.

#[cfg(feature = "gemini")]
/// Google Gemini backend.
pub mod gemini;

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::state::{
    keyword::Keyword,
    question::{Grade, QuestionRecord},
};

/// Result alias for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Error raised by question generators regardless of the backing model.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The backend could not be reached or answered with garbage.
    #[error("question generator unavailable: {message}")]
    Unavailable {
        /// Short description for logs and HTTP bodies.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend did not return one question per keyword letter.
    #[error("generator returned {actual} questions for a {expected}-letter keyword")]
    WrongCount {
        /// Keyword length.
        expected: usize,
        /// Number of records received.
        actual: usize,
    },
}

impl GeneratorError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        GeneratorError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Reference document attached to a generation request (base64 payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDocument {
    /// Base64 file contents.
    pub data: String,
    /// MIME type as declared by the uploader.
    pub mime_type: String,
}

impl InlineDocument {
    /// Only PDFs and images are handed to the model; other uploads are
    /// expected to arrive as extracted `context_text` instead.
    pub fn is_forwardable(&self) -> bool {
        let mime = self.mime_type.to_ascii_lowercase();
        mime.contains("pdf") || mime.contains("image")
    }
}

/// Everything a generator needs to produce one question per keyword letter.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Normalised keyword; its length fixes the question count.
    pub keyword: Keyword,
    /// Target grade level.
    pub grade: Grade,
    /// Lesson text to draw questions from.
    pub context_text: Option<String>,
    /// Lesson file to draw questions from.
    pub document: Option<InlineDocument>,
}

impl GenerationRequest {
    /// Attached document, if it is of a kind the model accepts.
    pub fn forwardable_document(&self) -> Option<&InlineDocument> {
        self.document.as_ref().filter(|doc| doc.is_forwardable())
    }

    /// Context text with surrounding blanks removed, if any is left.
    pub fn context(&self) -> Option<&str> {
        self.context_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Abstraction over the external service producing multiple-choice questions.
pub trait QuestionGenerator: Send + Sync {
    /// Produce question records in keyword order.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'static, GeneratorResult<Vec<QuestionRecord>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::keyword::normalize_keyword;

    fn doc(mime_type: &str) -> InlineDocument {
        InlineDocument {
            data: "AAAA".into(),
            mime_type: mime_type.into(),
        }
    }

    #[test]
    fn only_pdf_and_images_are_forwarded() {
        assert!(doc("application/pdf").is_forwardable());
        assert!(doc("image/png").is_forwardable());
        assert!(doc("IMAGE/JPEG").is_forwardable());
        assert!(!doc("application/vnd.openxmlformats-officedocument.wordprocessingml.document").is_forwardable());
        assert!(!doc("text/plain").is_forwardable());
    }

    #[test]
    fn blank_context_is_dropped() {
        let request = GenerationRequest {
            keyword: normalize_keyword("ram").unwrap(),
            grade: Grade::Ten,
            context_text: Some("  \n ".into()),
            document: Some(doc("text/plain")),
        };
        assert_eq!(request.context(), None);
        assert_eq!(request.forwardable_document(), None);
    }
}
