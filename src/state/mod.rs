pub mod events;
pub mod keyword;
pub mod question;
pub mod quiz;
pub mod roster;
pub mod scoring;
pub mod shuffle;
mod sse;
/// Round status machine with plan/apply/abort transitions.
pub mod state_machine;

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{runtime::Handle, sync::Mutex};
use tokio::time::timeout;
use tracing::warn;

use crate::{
    config::AppConfig,
    error::ServiceError,
    generator::QuestionGenerator,
    services::sse_events::broadcast_quiz_events,
    state::{
        quiz::{GameSetup, Quiz, QuizError},
        state_machine::PlanId,
    },
};

pub use self::sse::SseHub;

/// Handle shared by every handler and background task.
pub type SharedState = Arc<AppState>;

/// Central application state: the single quiz controller plus its collaborators.
pub struct AppState {
    quiz: Mutex<Quiz>,
    events: SseHub,
    config: AppConfig,
    generator: Option<Arc<dyn QuestionGenerator>>,
    transition_timeout: Option<Duration>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Without a generator, games can still be started with instructor-supplied questions.
    pub fn new(config: AppConfig, generator: Option<Arc<dyn QuestionGenerator>>) -> SharedState {
        let transition_timeout = Some(config.generation_timeout());
        Arc::new(Self {
            quiz: Mutex::new(Quiz::new()),
            events: SseHub::new(config.sse_capacity()),
            config,
            generator,
            transition_timeout,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the SSE stream.
    pub fn events(&self) -> &SseHub {
        &self.events
    }

    /// Installed question generator, if any.
    pub fn generator(&self) -> Option<Arc<dyn QuestionGenerator>> {
        self.generator.clone()
    }

    /// True when no question generator is configured.
    pub fn is_degraded(&self) -> bool {
        self.generator.is_none()
    }

    /// Run one quiz action under the lock, then publish whatever it emitted.
    ///
    /// Events are broadcast even when the action fails, since a failed
    /// action may still have something to report (an exhausted roster).
    pub async fn with_quiz<F, T>(&self, action: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Quiz) -> Result<T, QuizError>,
    {
        let (result, events) = {
            let mut quiz = self.quiz.lock().await;
            let result = action(&mut *quiz);
            (result, quiz.take_events())
        };
        broadcast_quiz_events(self, &events);
        result.map_err(ServiceError::from)
    }

    /// Read-only access to the quiz.
    pub async fn read_quiz<F, T>(&self, read: F) -> T
    where
        F: FnOnce(&Quiz) -> T,
    {
        let quiz = self.quiz.lock().await;
        read(&*quiz)
    }

    /// Start a round whose setup is produced asynchronously (question generation).
    ///
    /// The setup → playing transition is planned first so that concurrent
    /// actions are refused, `prepare` runs without holding the lock, and the
    /// plan is then applied with its result. Any failure or timeout aborts the
    /// plan and leaves the quiz in setup. If this future is dropped mid-way,
    /// [`PendingStart`] aborts the plan from its `Drop`.
    pub async fn run_start<F, Fut, R, T>(
        self: &Arc<Self>,
        prepare: F,
        respond: R,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GameSetup, ServiceError>>,
        R: FnOnce(&Quiz) -> T,
    {
        let plan = self.with_quiz(|quiz| quiz.begin_start()).await?;
        let mut pending = PendingStart::new(Arc::clone(self), plan.id);

        let prepare_future = prepare();
        let outcome = if let Some(limit) = self.transition_timeout {
            match timeout(limit, prepare_future).await {
                Ok(result) => result,
                Err(_) => {
                    self.abort_start(plan.id, "timeout").await;
                    pending.disarm();
                    return Err(ServiceError::Timeout);
                }
            }
        } else {
            prepare_future.await
        };

        let result = match outcome {
            Ok(setup) => {
                self.with_quiz(|quiz| {
                    quiz.finish_start(plan.id, setup)?;
                    Ok(respond(&*quiz))
                })
                .await
            }
            Err(err) => {
                self.abort_start(plan.id, "work error").await;
                Err(err)
            }
        };
        pending.disarm();
        result
    }

    async fn abort_start(&self, plan_id: PlanId, reason: &'static str) {
        if let Err(abort_err) = self.with_quiz(|quiz| quiz.abort_start(plan_id)).await {
            warn!(
                %plan_id,
                reason,
                error = %abort_err,
                "failed to abort start transition"
            );
        }
    }
}

/// Aborts a planned start when dropped while still armed.
struct PendingStart {
    state: SharedState,
    plan_id: Option<PlanId>,
}

impl PendingStart {
    fn new(state: SharedState, plan_id: PlanId) -> Self {
        Self {
            state,
            plan_id: Some(plan_id),
        }
    }

    fn disarm(&mut self) {
        self.plan_id = None;
    }
}

impl Drop for PendingStart {
    fn drop(&mut self) {
        let Some(plan_id) = self.plan_id.take() else {
            return;
        };
        let state = Arc::clone(&self.state);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    state.abort_start(plan_id, "cancelled").await;
                });
            }
            Err(_) => warn!(%plan_id, "start cancelled outside a runtime; plan left pending"),
        }
    }
}
