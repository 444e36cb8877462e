//! Secret Keyword Back binary entrypoint wiring REST, SSE and the question generator.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secret_keyword_back::{
    config::AppConfig,
    generator::QuestionGenerator,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let generator = build_generator();
    let app = build_router(AppState::new(config, generator));

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port()));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "secret keyword backend listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    Ok(())
}

/// Install the Gemini generator when credentials are present; otherwise run degraded.
#[cfg(feature = "gemini")]
fn build_generator() -> Option<Arc<dyn QuestionGenerator>> {
    use secret_keyword_back::generator::gemini::{GeminiConfig, GeminiGenerator};
    use tracing::warn;

    let config = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "question generator disabled; rounds need supplied questions");
            return None;
        }
    };

    match GeminiGenerator::new(config) {
        Ok(generator) => {
            info!(model = generator.model(), "Gemini question generator ready");
            Some(Arc::new(generator))
        }
        Err(err) => {
            warn!(error = %err, "failed to build Gemini client; running degraded");
            None
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn build_generator() -> Option<Arc<dyn QuestionGenerator>> {
    info!("built without a question generator; rounds need supplied questions");
    None
}

/// `PORT`, then `SERVER_PORT`, then 8080.
fn listen_port() -> u16 {
    ["PORT", "SERVER_PORT"]
        .into_iter()
        .find_map(|key| env::var(key).ok()?.parse().ok())
        .unwrap_or(8080)
}

/// Presentation clients are served from another origin, hence permissive CORS.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// `RUST_LOG` wins over the built-in filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
