use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{
        AnswerRequest, AnswerResponse, BoardResponse, PickResponse, QuestionView, StartGameRequest,
    },
    error::AppError,
    services::quiz_service,
    state::SharedState,
};

/// Routes driving a round: start, answers, navigation and the blind bag.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/start", post(start_game))
        .route("/game/board", get(board))
        .route("/game/questions/{position}", get(question))
        .route("/game/answer", post(answer))
        .route("/game/solve", post(solve))
        .route("/game/reset", post(reset))
        .route("/game/home", post(home))
        .route("/game/roster/pick", post(pick_student))
}

/// Start a round, generating questions first when none are supplied.
#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Round started", body = BoardResponse),
        (status = 400, description = "Invalid keyword or question list"),
        (status = 409, description = "A round is already running or being prepared"),
        (status = 503, description = "Question generation unavailable or timed out")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<StartGameRequest>>,
) -> Result<Json<BoardResponse>, AppError> {
    let board = quiz_service::start_game(&state, payload).await?;
    Ok(Json(board))
}

/// Current board snapshot.
#[utoipa::path(
    get,
    path = "/game/board",
    tag = "game",
    responses((status = 200, description = "Board snapshot", body = BoardResponse))
)]
pub async fn board(State(state): State<SharedState>) -> Json<BoardResponse> {
    Json(quiz_service::board(&state).await)
}

/// Question behind a tile, without its answer.
#[utoipa::path(
    get,
    path = "/game/questions/{position}",
    tag = "game",
    params(("position" = usize, Path, description = "Canonical position of the question")),
    responses(
        (status = 200, description = "Question", body = QuestionView),
        (status = 404, description = "No question at this position"),
        (status = 409, description = "No round in progress")
    )
)]
pub async fn question(
    State(state): State<SharedState>,
    Path(position): Path<usize>,
) -> Result<Json<QuestionView>, AppError> {
    let view = quiz_service::question(&state, position).await?;
    Ok(Json(view))
}

/// Submit an answer for a tile.
#[utoipa::path(
    post,
    path = "/game/answer",
    tag = "game",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer scored", body = AnswerResponse),
        (status = 400, description = "Position outside the keyword"),
        (status = 409, description = "No round in progress")
    )
)]
pub async fn answer(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AnswerRequest>>,
) -> Result<Json<AnswerResponse>, AppError> {
    let response = quiz_service::answer(&state, payload).await?;
    Ok(Json(response))
}

/// Decode the keyword once every tile is revealed.
#[utoipa::path(
    post,
    path = "/game/solve",
    tag = "game",
    responses(
        (status = 200, description = "Keyword solved", body = BoardResponse),
        (status = 409, description = "Tiles are still hidden")
    )
)]
pub async fn solve(State(state): State<SharedState>) -> Result<Json<BoardResponse>, AppError> {
    let board = quiz_service::solve(&state).await?;
    Ok(Json(board))
}

/// Hide every tile and re-shuffle them.
#[utoipa::path(
    post,
    path = "/game/reset",
    tag = "game",
    responses(
        (status = 200, description = "Progress reset", body = BoardResponse),
        (status = 409, description = "No round in progress")
    )
)]
pub async fn reset(State(state): State<SharedState>) -> Result<Json<BoardResponse>, AppError> {
    let board = quiz_service::reset(&state).await?;
    Ok(Json(board))
}

/// Discard the round and return to setup.
#[utoipa::path(
    post,
    path = "/game/home",
    tag = "game",
    responses((status = 200, description = "Back to setup", body = BoardResponse))
)]
pub async fn home(State(state): State<SharedState>) -> Result<Json<BoardResponse>, AppError> {
    let board = quiz_service::home(&state).await?;
    Ok(Json(board))
}

/// Draw a random student from the roster.
#[utoipa::path(
    post,
    path = "/game/roster/pick",
    tag = "game",
    responses(
        (status = 200, description = "Student picked", body = PickResponse),
        (status = 409, description = "Roster exhausted")
    )
)]
pub async fn pick_student(
    State(state): State<SharedState>,
) -> Result<Json<PickResponse>, AppError> {
    let picked = quiz_service::pick_student(&state).await?;
    Ok(Json(picked))
}
