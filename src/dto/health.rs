use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when rounds must bring their own questions.
    pub status: String,
    /// Whether questions can be generated on this server.
    pub generator: bool,
}

impl HealthResponse {
    /// Generator configured.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            generator: true,
        }
    }

    /// No question generator is configured; rounds need supplied questions.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            generator: false,
        }
    }
}
