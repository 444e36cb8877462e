use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a keyword round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// No keyword bound; the instructor is preparing the round.
    #[default]
    Setup,
    /// Tiles are being flipped by answering questions.
    Playing,
    /// Every letter is showing, still in scrambled order.
    Revealed,
    /// Keyword decoded; tiles shown in reading order.
    Solved,
}

/// Triggers that move a round between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A validated keyword/question set was bound.
    StartGame,
    /// The last hidden tile was answered correctly.
    AllRevealed,
    /// The instructor triggered the decode animation.
    Solve,
    /// Re-shuffle and hide every tile, keeping the keyword.
    ResetProgress,
    /// Drop the round and go back to the setup screen.
    BackToSetup,
}

/// `event` has no edge out of `from`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {event:?} while the round is {from:?}")]
pub struct InvalidTransition {
    /// Status at the time of the refusal.
    pub from: GameStatus,
    /// Trigger that was refused.
    pub event: GameEvent,
}

/// Why a transition could not be reserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Another plan holds the machine until it is applied or aborted.
    #[error("a state transition is already pending")]
    AlreadyPending,
    /// No edge for this trigger from the current status.
    #[error(transparent)]
    InvalidTransition(InvalidTransition),
}

/// Why a reserved transition could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// Nothing was reserved.
    #[error("no transition is pending")]
    NoPending,
    /// The caller holds a stale or foreign plan id.
    #[error("pending transition {expected} does not match {got}")]
    IdMismatch {
        /// Id of the reserved plan.
        expected: PlanId,
        /// Id the caller presented.
        got: PlanId,
    },
    /// Status moved underneath the plan.
    #[error("status changed during transition (expected {expected:?}, got {actual:?})")]
    StatusMismatch {
        /// Status recorded in the plan.
        expected: GameStatus,
        /// Status found at commit time.
        actual: GameStatus,
    },
    /// Another transition was committed after the plan was made.
    #[error("state version mismatch during transition (expected {expected}, got {actual})")]
    VersionMismatch {
        /// Version recorded in the plan.
        expected: usize,
        /// Version found at commit time.
        actual: usize,
    },
}

/// Why a reserved transition could not be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortError {
    /// Nothing was reserved.
    #[error("no pending transition")]
    NoPending,
    /// The caller holds a stale or foreign plan id.
    #[error("transition plan {got} does not match pending plan {expected}")]
    IdMismatch {
        /// Id of the reserved plan.
        expected: PlanId,
        /// Id the caller presented.
        got: PlanId,
    },
}

/// Identifier handed out by [`GameStateMachine::plan`].
pub type PlanId = Uuid;

/// Reserved transition: checked against the table, not yet committed.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Id to present to `apply` or `abort`.
    pub id: PlanId,
    /// Status when the plan was made.
    pub from: GameStatus,
    /// Status after commit.
    pub to: GameStatus,
    /// Trigger being carried out.
    pub event: GameEvent,
    /// Version the machine will carry once committed.
    pub version_next: usize,
}

/// Point-in-time view of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Committed status.
    pub status: GameStatus,
    /// Bumped by every committed transition.
    pub version: usize,
    /// Target of the reserved transition, if any.
    pub pending: Option<GameStatus>,
}

/// State machine driving the setup → playing → revealed → solved lifecycle.
#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    status: GameStatus,
    version: usize,
    pending: Option<Plan>,
}

impl GameStateMachine {
    /// Create a new state machine initialised in [`GameStatus::Setup`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether a planned transition is waiting to be applied or aborted.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Copy out status, version and pending target.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            version: self.version,
            pending: self.pending.as_ref().map(|plan| plan.to),
        }
    }

    /// Reserve the transition for `event`; only one reservation may exist at a time.
    pub fn plan(&mut self, event: GameEvent) -> Result<Plan, PlanError> {
        if self.pending.is_some() {
            return Err(PlanError::AlreadyPending);
        }

        let next = self
            .compute_transition(event)
            .map_err(PlanError::InvalidTransition)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            from: self.status,
            to: next,
            event,
            version_next: self.version + 1,
        };

        self.pending = Some(plan.clone());

        Ok(plan)
    }

    /// Commit the reservation `plan_id`.
    pub fn apply(&mut self, plan_id: PlanId) -> Result<GameStatus, ApplyError> {
        let plan = self.pending.take().ok_or(ApplyError::NoPending)?;

        if plan.id != plan_id {
            let expected = plan.id;
            self.pending = Some(plan);
            return Err(ApplyError::IdMismatch {
                expected,
                got: plan_id,
            });
        }

        if self.status != plan.from {
            return Err(ApplyError::StatusMismatch {
                expected: plan.from,
                actual: self.status,
            });
        }

        if self.version + 1 != plan.version_next {
            return Err(ApplyError::VersionMismatch {
                expected: plan.version_next,
                actual: self.version + 1,
            });
        }

        self.status = plan.to;
        self.version = plan.version_next;

        Ok(self.status)
    }

    /// Drop the reservation `plan_id`, leaving the status untouched.
    pub fn abort(&mut self, plan_id: PlanId) -> Result<(), AbortError> {
        let plan = self.pending.as_ref().ok_or(AbortError::NoPending)?;

        if plan.id != plan_id {
            return Err(AbortError::IdMismatch {
                expected: plan.id,
                got: plan_id,
            });
        }

        self.pending = None;
        Ok(())
    }

    /// Plan and immediately apply `event`.
    pub fn fire(&mut self, event: GameEvent) -> Result<GameStatus, PlanError> {
        let plan = self.plan(event)?;
        // Nothing can run between plan and apply here, so apply cannot fail.
        self.status = plan.to;
        self.version = plan.version_next;
        self.pending = None;
        Ok(self.status)
    }

    /// The transition table.
    fn compute_transition(&self, event: GameEvent) -> Result<GameStatus, InvalidTransition> {
        let next = match (self.status, event) {
            (GameStatus::Setup, GameEvent::StartGame) => GameStatus::Playing,
            (GameStatus::Playing, GameEvent::AllRevealed) => GameStatus::Revealed,
            (GameStatus::Revealed | GameStatus::Solved, GameEvent::Solve) => GameStatus::Solved,
            (
                GameStatus::Playing | GameStatus::Revealed | GameStatus::Solved,
                GameEvent::ResetProgress,
            ) => GameStatus::Playing,
            (_, GameEvent::BackToSetup) => GameStatus::Setup,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
