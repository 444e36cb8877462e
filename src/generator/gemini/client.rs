use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    generator::{GenerationRequest, GeneratorResult, QuestionGenerator},
    state::question::QuestionRecord,
};

use super::{
    config::GeminiConfig,
    error::{GeminiError, GeminiResult},
    models::{Blob, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
    prompt::{build_prompt, response_schema},
};

/// [`QuestionGenerator`] backed by the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    base_url: Arc<str>,
    model: Arc<str>,
    api_key: Arc<str>,
}

impl GeminiGenerator {
    /// Build the HTTP client for `config`.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| GeminiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            model: Arc::from(config.model),
            api_key: Arc::from(config.api_key),
        })
    }

    /// Model name requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: build_prompt(request),
        }];
        if let Some(document) = request.forwardable_document() {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: document.mime_type.clone(),
                    data: document.data.clone(),
                },
            });
        }

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    async fn generate_content(&self, request: GenerationRequest) -> GeminiResult<Vec<QuestionRecord>> {
        let body = Self::request_body(&request);
        debug!(
            model = %self.model,
            letters = request.keyword.len(),
            with_document = request.forwardable_document().is_some(),
            "requesting questions"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|source| GeminiError::RequestSend {
                model: self.model.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini rejected the request");
            return Err(GeminiError::RequestStatus { status, body });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|source| GeminiError::DecodeResponse { source })?;
        let text = payload.text().ok_or(GeminiError::EmptyResponse)?;

        parse_questions(&text)
    }
}

/// Decode the model's JSON text into question records.
fn parse_questions(text: &str) -> GeminiResult<Vec<QuestionRecord>> {
    serde_json::from_str(text.trim()).map_err(|source| GeminiError::DeserializeQuestions { source })
}

impl QuestionGenerator for GeminiGenerator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'static, GeneratorResult<Vec<QuestionRecord>>> {
        let generator = self.clone();
        Box::pin(async move {
            generator
                .generate_content(request)
                .await
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generator::InlineDocument,
        state::{
            keyword::normalize_keyword,
            question::{Choice, Grade},
        },
    };

    #[test]
    fn endpoint_uses_model_path() {
        let generator = GeminiGenerator::new(
            GeminiConfig::new("key")
                .with_model("gemini-test")
                .with_base_url("http://localhost:9999/"),
        )
        .unwrap();
        assert_eq!(
            generator.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn body_skips_documents_that_cannot_be_forwarded() {
        let mut request = GenerationRequest {
            keyword: normalize_keyword("io").unwrap(),
            grade: Grade::Ten,
            context_text: None,
            document: Some(InlineDocument {
                data: "AAAA".into(),
                mime_type: "text/plain".into(),
            }),
        };
        let body = serde_json::to_value(GeminiGenerator::request_body(&request)).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        request.document = Some(InlineDocument {
            data: "AAAA".into(),
            mime_type: "image/png".into(),
        });
        let body = serde_json::to_value(GeminiGenerator::request_body(&request)).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
    }

    #[test]
    fn parses_generated_records() {
        let text = r#"[{"text":"Q","options":{"A":"a","B":"b","C":"c","D":"d"},"correctAnswer":"C"}]"#;
        let records = parse_questions(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].correct_answer, Choice::C);

        assert!(matches!(
            parse_questions("not json"),
            Err(GeminiError::DeserializeQuestions { .. })
        ));
    }
}
