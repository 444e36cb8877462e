//! Notifications emitted by the quiz controller for the presentation layer
//! (sounds, confetti, the blind-bag reveal).

use uuid::Uuid;

use crate::state::question::Grade;

/// Something observable happened to the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    /// A new round started.
    Started {
        /// Identifier of the new round.
        session_id: Uuid,
        /// Grade the questions target.
        grade: Grade,
        /// Number of tiles on the board.
        tile_count: usize,
    },
    /// A question was answered correctly and its tile flipped.
    TileRevealed {
        /// Canonical position of the answered question.
        position: usize,
        /// Display slot holding that position.
        slot: usize,
        /// Letter now showing on the tile.
        letter: char,
        /// Tiles revealed so far.
        revealed: usize,
        /// Tiles on the board.
        total: usize,
    },
    /// A wrong option was submitted.
    WrongAnswer {
        /// Canonical position of the question.
        position: usize,
    },
    /// The last hidden tile flipped.
    AllRevealed,
    /// The keyword was decoded.
    Solved {
        /// Keyword in reading order.
        keyword: String,
    },
    /// Tiles were hidden and re-shuffled.
    ProgressReset,
    /// The round was discarded.
    BackToSetup,
    /// The blind bag picked a student.
    StudentPicked {
        /// Name drawn.
        name: String,
        /// Names left in the bag.
        remaining: usize,
    },
    /// The blind bag was opened with nobody left in it.
    RosterExhausted,
}

impl QuizEvent {
    /// Event name used on the SSE stream.
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::Started { .. } => "game.started",
            QuizEvent::TileRevealed { .. } => "tile.revealed",
            QuizEvent::WrongAnswer { .. } => "answer.wrong",
            QuizEvent::AllRevealed => "game.revealed",
            QuizEvent::Solved { .. } => "game.solved",
            QuizEvent::ProgressReset => "game.reset",
            QuizEvent::BackToSetup => "game.home",
            QuizEvent::StudentPicked { .. } => "student.picked",
            QuizEvent::RosterExhausted => "roster.exhausted",
        }
    }
}
