use axum::Router;

use crate::state::SharedState;

/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Round lifecycle endpoints under `/game`.
pub mod game;
/// Liveness probe.
pub mod health;
/// Question preview before a round starts.
pub mod setup;
/// Event stream for presentation clients.
pub mod sse;

/// Compose all route trees and attach the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(sse::router())
        .merge(setup::router())
        .merge(game::router())
        .merge(docs::router())
        .with_state(state)
}
