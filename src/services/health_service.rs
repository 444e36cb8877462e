use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the backend can generate questions.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        debug!("no question generator configured (degraded mode)");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
