use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    generator::GeneratorError,
    state::{
        quiz::QuizError,
        state_machine::{AbortError, ApplyError, PlanError},
    },
};

/// Failures surfaced by the quiz and generation services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Question generator failed or returned unusable data.
    #[error("question generator unavailable")]
    Unavailable(#[source] GeneratorError),
    /// No question generator is configured.
    #[error("question generator unavailable (degraded mode)")]
    Degraded,
    /// The request itself is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The round is not in a status that allows the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Addressed item does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Generation did not finish within the configured budget.
    #[error("operation timed out")]
    Timeout,
}

impl From<GeneratorError> for ServiceError {
    fn from(err: GeneratorError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<QuizError> for ServiceError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::InvalidSetup(setup) => ServiceError::InvalidInput(setup.to_string()),
            QuizError::InvalidPosition(scoring) => ServiceError::InvalidInput(scoring.to_string()),
            QuizError::EmptyRoster(_) => {
                ServiceError::InvalidState("student roster is exhausted".into())
            }
            QuizError::NoActiveGame => ServiceError::InvalidState("no game is in progress".into()),
            QuizError::Plan(plan) => plan.into(),
            QuizError::Apply(apply) => apply.into(),
            QuizError::Abort(abort) => abort.into(),
        }
    }
}

impl From<PlanError> for ServiceError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::AlreadyPending => {
                ServiceError::InvalidState("a round is being prepared".into())
            }
            PlanError::InvalidTransition(invalid) => {
                ServiceError::InvalidState(invalid.to_string())
            }
        }
    }
}

impl From<ApplyError> for ServiceError {
    fn from(err: ApplyError) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<AbortError> for ServiceError {
    fn from(err: AbortError) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// HTTP-facing error; every variant renders as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Addressed item does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Request is valid but the round's status forbids it.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The generator is absent or did not deliver in time.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => {
                AppError::ServiceUnavailable("no question generator configured".into())
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Timeout => {
                AppError::ServiceUnavailable("question generation timed out".into())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
