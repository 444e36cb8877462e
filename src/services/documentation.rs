use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Secret Keyword Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::events_stream,
        crate::routes::setup::generate_questions,
        crate::routes::game::start_game,
        crate::routes::game::board,
        crate::routes::game::question,
        crate::routes::game::answer,
        crate::routes::game::solve,
        crate::routes::game::reset,
        crate::routes::game::home,
        crate::routes::game::pick_student,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::setup::GenerateQuestionsRequest,
            crate::dto::setup::InlineDocumentInput,
            crate::dto::setup::GeneratedQuestionsResponse,
            crate::dto::setup::GeneratedQuestion,
            crate::dto::game::StartGameRequest,
            crate::dto::game::BoardResponse,
            crate::dto::game::TileSnapshot,
            crate::dto::game::QuestionView,
            crate::dto::game::AnswerRequest,
            crate::dto::game::AnswerResponse,
            crate::dto::game::PickResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::GameStartedEvent,
            crate::dto::sse::TileRevealedEvent,
            crate::dto::sse::AnswerWrongEvent,
            crate::dto::sse::GameSolvedEvent,
            crate::dto::sse::StatusChangedEvent,
            crate::dto::sse::StudentPickedEvent,
            crate::dto::sse::RosterExhaustedEvent,
            crate::state::question::Grade,
            crate::state::question::Choice,
            crate::state::question::ChoiceOptions,
            crate::state::question::QuestionRecord,
            crate::state::state_machine::GameStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream for the presentation layer"),
        (name = "setup", description = "Question preparation before a round"),
        (name = "game", description = "Round lifecycle, answers and the blind bag"),
    )
)]
/// OpenAPI description of the backend.
pub struct ApiDoc;
