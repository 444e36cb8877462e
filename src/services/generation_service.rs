//! Question generation on behalf of the setup screen and generated starts.

use tokio::time::timeout;
use tracing::{info, warn};

use crate::{
    dto::setup::{GenerateQuestionsRequest, GeneratedQuestion, GeneratedQuestionsResponse},
    error::ServiceError,
    generator::{GenerationRequest, GeneratorError, QuestionGenerator},
    state::{
        SharedState,
        keyword::{Keyword, normalize_keyword},
        question::QuestionRecord,
    },
};

/// Normalise `raw` and enforce the configured keyword length.
pub fn checked_keyword(state: &SharedState, raw: &str) -> Result<Keyword, ServiceError> {
    let keyword =
        normalize_keyword(raw).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let max = state.config().max_keyword_len();
    if keyword.len() > max {
        return Err(ServiceError::InvalidInput(format!(
            "keyword has {} letters, at most {max} are allowed",
            keyword.len()
        )));
    }
    Ok(keyword)
}

/// Ask `generator` for one question per keyword letter and check the count.
pub async fn request_questions(
    generator: &dyn QuestionGenerator,
    request: GenerationRequest,
) -> Result<Vec<QuestionRecord>, ServiceError> {
    let expected = request.keyword.len();
    let records = match generator.generate(request).await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "question generation failed");
            return Err(err.into());
        }
    };

    if records.len() != expected {
        warn!(expected, actual = records.len(), "generator returned the wrong number of questions");
        return Err(GeneratorError::WrongCount {
            expected,
            actual: records.len(),
        }
        .into());
    }

    info!(count = records.len(), "questions generated");
    Ok(records)
}

/// Generate questions for review without touching the game status.
pub async fn preview_questions(
    state: &SharedState,
    payload: GenerateQuestionsRequest,
) -> Result<GeneratedQuestionsResponse, ServiceError> {
    let generator = state.generator().ok_or(ServiceError::Degraded)?;
    let keyword = checked_keyword(state, &payload.keyword)?;

    let request = GenerationRequest {
        keyword: keyword.clone(),
        grade: payload.grade,
        context_text: payload.context_text,
        document: payload.document.map(Into::into),
    };

    let limit = state.config().generation_timeout();
    let records = timeout(limit, request_questions(generator.as_ref(), request))
        .await
        .map_err(|_| {
            warn!(timeout_ms = limit.as_millis() as u64, "question preview timed out");
            ServiceError::Timeout
        })??;

    let questions = keyword
        .chars()
        .iter()
        .zip(records)
        .enumerate()
        .map(|(position, (letter, record))| GeneratedQuestion {
            position,
            keyword_char: letter.to_string(),
            record,
        })
        .collect();

    Ok(GeneratedQuestionsResponse {
        keyword: keyword.as_string(),
        grade: payload.grade,
        questions,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        services::test_support::StubGenerator,
        state::{
            AppState,
            question::{Choice, Grade},
        },
    };

    fn preview_request(keyword: &str) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            keyword: keyword.into(),
            grade: Grade::Eleven,
            context_text: None,
            document: None,
        }
    }

    #[tokio::test]
    async fn preview_binds_letters_to_records() {
        let generator = Arc::new(StubGenerator::answering(vec![Choice::A, Choice::D]));
        let state = AppState::new(AppConfig::default(), Some(generator.clone()));

        let response = preview_questions(&state, preview_request("a i")).await.unwrap();
        assert_eq!(response.keyword, "AI");
        assert_eq!(response.questions.len(), 2);
        assert_eq!(response.questions[1].keyword_char, "I");
        assert_eq!(response.questions[1].record.correct_answer, Choice::D);
        assert_eq!(generator.last_keyword().as_deref(), Some("AI"));

        let status = state.read_quiz(|quiz| quiz.status()).await;
        assert_eq!(status, crate::state::state_machine::GameStatus::Setup);
    }

    #[tokio::test]
    async fn preview_rejects_wrong_question_count() {
        let generator = Arc::new(StubGenerator::answering(vec![Choice::A]));
        let state = AppState::new(AppConfig::default(), Some(generator));

        let err = preview_questions(&state, preview_request("cpu")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Unavailable(GeneratorError::WrongCount {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn preview_without_generator_is_degraded() {
        let state = AppState::new(AppConfig::default(), None);
        assert!(matches!(
            preview_questions(&state, preview_request("ram")).await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn overlong_keyword_is_rejected() {
        let state = AppState::new(AppConfig::default(), None);
        let long = "x".repeat(AppConfig::default().max_keyword_len() + 1);
        assert!(matches!(
            checked_keyword(&state, &long),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(checked_keyword(&state, " x ").is_ok());
    }
}
