//! The quiz controller: sole owner of the round aggregate. Every mutation goes
//! through one of its action methods, each of which either completes fully or
//! leaves the aggregate untouched.

use std::{mem, time::SystemTime};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::state::{
    events::QuizEvent,
    keyword::{Keyword, KeywordError, TileLayout, display_char_at, init_layout, normalize_keyword},
    question::{Choice, Grade, Question, QuestionCountMismatch, QuestionRecord, bind_questions},
    roster::{EmptyRoster, Roster},
    scoring::{RevealSet, ScoringError, is_complete, record_reveal, submit_answer},
    state_machine::{
        AbortError, ApplyError, GameEvent, GameStateMachine, GameStatus, Plan, PlanError, PlanId,
        Snapshot,
    },
};

/// Reasons a setup is refused; the controller stays in [`GameStatus::Setup`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Keyword normalised to nothing or contains no letters.
    #[error(transparent)]
    Keyword(#[from] KeywordError),
    /// Question list does not match the keyword length.
    #[error(transparent)]
    Questions(#[from] QuestionCountMismatch),
}

/// Failures surfaced by quiz actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Keyword or question list rejected.
    #[error("invalid setup: {0}")]
    InvalidSetup(#[from] SetupError),
    /// The blind bag has no names left.
    #[error(transparent)]
    EmptyRoster(#[from] EmptyRoster),
    /// Caller addressed a position outside the keyword.
    #[error(transparent)]
    InvalidPosition(#[from] ScoringError),
    /// Action requires a round but the quiz is in setup.
    #[error("no game is in progress")]
    NoActiveGame,
    /// Transition refused, or a start is being prepared.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Reserved start could not be committed.
    #[error(transparent)]
    Apply(#[from] ApplyError),
    /// Reserved start could not be dropped.
    #[error(transparent)]
    Abort(#[from] AbortError),
}

/// Everything needed to start a round.
#[derive(Debug, Clone)]
pub struct GameSetup {
    /// Raw keyword as typed by the instructor.
    pub keyword: String,
    /// Grade the questions target.
    pub grade: Grade,
    /// One record per keyword letter, in keyword order.
    pub questions: Vec<QuestionRecord>,
    /// Names for the blind bag; may be empty.
    pub roster: Roster,
}

/// Why an answer was accepted but had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The tile was already flipped.
    AlreadyRevealed,
    /// The round is past the answering stage.
    NotPlaying,
}

/// Result of [`Quiz::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Tile flipped; `complete` is set when it was the last one.
    Correct {
        /// Set when this was the last hidden tile.
        complete: bool,
    },
    /// Wrong option; nothing changed.
    Incorrect,
    /// Guarded no-op.
    Ignored(IgnoredReason),
}

impl AnswerOutcome {
    /// Whether the submitted choice matched the expected answer.
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct { .. })
    }
}

/// One tile as the board should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    /// Display slot, left to right.
    pub slot: usize,
    /// Canonical position (question index) held by this slot.
    pub position: usize,
    /// Whether the letter is showing.
    pub revealed: bool,
    /// Letter, present only once the tile is revealed.
    pub letter: Option<char>,
}

/// Student drawn from the blind bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedStudent {
    /// Name drawn.
    pub name: String,
    /// Names left in the bag.
    pub remaining: usize,
}

/// State of one round, from start until the instructor returns to setup.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    created_at: SystemTime,
    keyword: Keyword,
    grade: Grade,
    questions: Vec<Question>,
    roster: Roster,
    reveals: RevealSet,
    layout: TileLayout,
}

impl GameSession {
    fn build(setup: GameSetup) -> Result<Self, SetupError> {
        let keyword = normalize_keyword(&setup.keyword)?;
        let questions = bind_questions(&keyword, setup.questions)?;
        let layout = init_layout(&keyword);

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: SystemTime::now(),
            keyword,
            grade: setup.grade,
            questions,
            roster: setup.roster,
            reveals: RevealSet::new(),
            layout,
        })
    }

    /// Identifier of this round.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the round started.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Normalised keyword.
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    /// Grade the questions target.
    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Questions in canonical order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question bound to a canonical position.
    pub fn question(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    /// Names still in the blind bag.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Positions answered correctly.
    pub fn reveals(&self) -> &RevealSet {
        &self.reveals
    }

    /// Scrambled slot order.
    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    /// Board tiles for `status`, in display order.
    pub fn tiles(&self, status: GameStatus) -> Vec<TileView> {
        self.layout
            .order()
            .iter()
            .enumerate()
            .map(|(slot, &held)| {
                let (position, revealed) = match status {
                    GameStatus::Solved => (slot, true),
                    _ => (held, self.reveals.contains(held)),
                };
                let letter = revealed
                    .then(|| display_char_at(slot, &self.layout, &self.keyword, status))
                    .flatten();
                TileView {
                    slot,
                    position,
                    revealed,
                    letter,
                }
            })
            .collect()
    }

    fn check_position(&self, position: usize) -> Result<(), ScoringError> {
        if position < self.keyword.len() {
            Ok(())
        } else {
            Err(ScoringError::InvalidPosition {
                position,
                len: self.keyword.len(),
            })
        }
    }
}

/// Controller owning the status machine and the current round.
#[derive(Debug, Default)]
pub struct Quiz {
    machine: GameStateMachine,
    session: Option<GameSession>,
    events: Vec<QuizEvent>,
}

impl Quiz {
    /// Fresh controller in [`GameStatus::Setup`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed round status.
    pub fn status(&self) -> GameStatus {
        self.machine.status()
    }

    /// Status machine view, including any reserved start.
    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// Current round, absent while in setup.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Drain notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<QuizEvent> {
        mem::take(&mut self.events)
    }

    /// Start a round in one step.
    pub fn start(&mut self, setup: GameSetup) -> Result<&GameSession, QuizError> {
        let plan = self.begin_start()?;
        self.finish_start(plan.id, setup)
    }

    /// Reserve the setup → playing transition while questions are being prepared.
    ///
    /// Every other action fails with [`PlanError::AlreadyPending`] until the
    /// plan is finished or aborted.
    pub fn begin_start(&mut self) -> Result<Plan, QuizError> {
        let plan = self.machine.plan(GameEvent::StartGame)?;
        debug!(plan_id = %plan.id, "start transition planned");
        Ok(plan)
    }

    /// Validate `setup` and commit the planned start, or abort the plan when invalid.
    pub fn finish_start(
        &mut self,
        plan_id: PlanId,
        setup: GameSetup,
    ) -> Result<&GameSession, QuizError> {
        let session = match GameSession::build(setup) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "rejecting game setup");
                self.machine.abort(plan_id)?;
                return Err(err.into());
            }
        };

        self.machine.apply(plan_id)?;
        info!(
            session_id = %session.id,
            tiles = session.keyword.len(),
            roster = session.roster.len(),
            grade = session.grade.level(),
            "game started"
        );
        self.events.push(QuizEvent::Started {
            session_id: session.id,
            grade: session.grade,
            tile_count: session.keyword.len(),
        });

        Ok(&*self.session.insert(session))
    }

    /// Drop a planned start, leaving the quiz in setup.
    pub fn abort_start(&mut self, plan_id: PlanId) -> Result<(), QuizError> {
        self.machine.abort(plan_id)?;
        debug!(%plan_id, "start transition aborted");
        Ok(())
    }

    /// Submit `choice` for the question at canonical `position`.
    pub fn answer(&mut self, position: usize, choice: Choice) -> Result<AnswerOutcome, QuizError> {
        if self.machine.is_pending() {
            return Err(PlanError::AlreadyPending.into());
        }
        let status = self.machine.status();
        let Some(session) = self.session.as_mut() else {
            return Err(QuizError::NoActiveGame);
        };

        if let Err(err) = session.check_position(position) {
            error!(error = %err, "answer addressed a tile that does not exist");
            return Err(err.into());
        }

        if status != GameStatus::Playing {
            debug!(position, ?status, "ignoring answer outside of play");
            return Ok(AnswerOutcome::Ignored(IgnoredReason::NotPlaying));
        }

        if session.reveals.contains(position) {
            debug!(position, "ignoring answer for an already revealed tile");
            return Ok(AnswerOutcome::Ignored(IgnoredReason::AlreadyRevealed));
        }

        if !submit_answer(&session.questions, position, choice)? {
            debug!(position, ?choice, "wrong answer");
            self.events.push(QuizEvent::WrongAnswer { position });
            return Ok(AnswerOutcome::Incorrect);
        }

        record_reveal(&mut session.reveals, position);
        let total = session.keyword.len();
        let revealed = session.reveals.len();
        let slot = session
            .layout
            .slot_of(position)
            .ok_or(ScoringError::InvalidPosition { position, len: total })?;
        let letter = session.keyword.char_at(position).unwrap_or_default();
        info!(position, slot, revealed, total, "tile revealed");
        self.events.push(QuizEvent::TileRevealed {
            position,
            slot,
            letter,
            revealed,
            total,
        });

        let complete = is_complete(&session.reveals, total);
        if complete {
            self.machine.fire(GameEvent::AllRevealed)?;
            info!("every tile revealed");
            self.events.push(QuizEvent::AllRevealed);
        }

        Ok(AnswerOutcome::Correct { complete })
    }

    /// Decode the keyword once every tile is showing.
    pub fn solve(&mut self) -> Result<GameStatus, QuizError> {
        let before = self.machine.status();
        let next = self.machine.fire(GameEvent::Solve)?;
        if before == GameStatus::Solved {
            return Ok(next);
        }
        if let Some(session) = &self.session {
            info!("keyword solved");
            self.events.push(QuizEvent::Solved {
                keyword: session.keyword.as_string(),
            });
        }
        Ok(next)
    }

    /// Hide every tile and re-shuffle, keeping keyword, questions and roster.
    pub fn reset_progress(&mut self) -> Result<GameStatus, QuizError> {
        let next = self.machine.fire(GameEvent::ResetProgress)?;
        let session = self.session.as_mut().ok_or(QuizError::NoActiveGame)?;
        session.reveals.clear();
        session.layout = init_layout(&session.keyword);
        info!(session_id = %session.id, "progress reset");
        self.events.push(QuizEvent::ProgressReset);
        Ok(next)
    }

    /// Discard the round entirely.
    pub fn back_to_setup(&mut self) -> Result<GameStatus, QuizError> {
        let before = self.machine.status();
        let next = self.machine.fire(GameEvent::BackToSetup)?;
        if let Some(session) = self.session.take() {
            info!(session_id = %session.id, "round discarded");
        }
        if before != GameStatus::Setup {
            self.events.push(QuizEvent::BackToSetup);
        }
        Ok(next)
    }

    /// Draw a random student from the roster; status is never affected.
    pub fn pick_student(&mut self) -> Result<PickedStudent, QuizError> {
        let drawn = match self.session.as_mut() {
            Some(session) => session.roster.draw().map(|name| PickedStudent {
                name,
                remaining: session.roster.len(),
            }),
            None => Err(EmptyRoster),
        };

        match drawn {
            Ok(picked) => {
                info!(remaining = picked.remaining, "student picked");
                self.events.push(QuizEvent::StudentPicked {
                    name: picked.name.clone(),
                    remaining: picked.remaining,
                });
                Ok(picked)
            }
            Err(err) => {
                debug!("blind bag is empty");
                self.events.push(QuizEvent::RosterExhausted);
                Err(err.into())
            }
        }
    }
}
