use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::{validate_keyword, validate_mime_type},
    generator::InlineDocument,
    state::question::{Grade, QuestionRecord},
};

/// Reference document uploaded with a generation request.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct InlineDocumentInput {
    /// Base64-encoded file contents.
    #[validate(length(min = 1))]
    pub data: String,
    #[validate(custom(function = "validate_mime_type"))]
    pub mime_type: String,
}

impl From<InlineDocumentInput> for InlineDocument {
    fn from(value: InlineDocumentInput) -> Self {
        Self {
            data: value.data,
            mime_type: value.mime_type,
        }
    }
}

/// Ask the generator for questions without starting a round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(custom(function = "validate_keyword"))]
    pub keyword: String,
    #[serde(default)]
    pub grade: Grade,
    /// Plain text extracted from lesson material.
    #[serde(default)]
    pub context_text: Option<String>,
    /// Forwarded to the model only for PDFs and images.
    #[serde(default)]
    #[validate(nested)]
    pub document: Option<InlineDocumentInput>,
}

/// Generated records, one per keyword letter, ready to be reviewed and sent to `/game/start`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedQuestionsResponse {
    /// Normalised keyword the questions are bound to.
    pub keyword: String,
    pub grade: Grade,
    pub questions: Vec<GeneratedQuestion>,
}

/// One generated record with the letter it will be attached to.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedQuestion {
    pub position: usize,
    pub keyword_char: String,
    #[serde(flatten)]
    pub record: QuestionRecord,
}
