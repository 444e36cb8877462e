use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::setup::{GenerateQuestionsRequest, GeneratedQuestionsResponse},
    error::AppError,
    services::generation_service,
    state::SharedState,
};

/// Routes used by the setup screen before a round starts.
pub fn router() -> Router<SharedState> {
    Router::new().route("/setup/questions", post(generate_questions))
}

/// Generate questions for review; the game status is left untouched.
#[utoipa::path(
    post,
    path = "/setup/questions",
    tag = "setup",
    request_body = GenerateQuestionsRequest,
    responses(
        (status = 200, description = "Questions generated", body = GeneratedQuestionsResponse),
        (status = 400, description = "Invalid keyword"),
        (status = 503, description = "Question generation unavailable or timed out")
    )
)]
pub async fn generate_questions(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<GenerateQuestionsRequest>>,
) -> Result<Json<GeneratedQuestionsResponse>, AppError> {
    let response = generation_service::preview_questions(&state, payload).await?;
    Ok(Json(response))
}
