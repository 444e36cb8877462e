//! Answer checking and reveal tracking.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::state::question::{Choice, Question};

/// Contract violations raised by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// Position outside `0..keyword_len`; callers must never produce one.
    #[error("position {position} is outside the keyword (length {len})")]
    InvalidPosition {
        /// Requested position.
        position: usize,
        /// Keyword length.
        len: usize,
    },
}

/// Canonical positions answered correctly so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSet {
    positions: BTreeSet<usize>,
}

impl RevealSet {
    /// Empty set, as at the start of a round.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `position` has already been revealed.
    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    /// Number of revealed positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing has been revealed yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Revealed positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    /// Add `position`; returns `false` when it was already present.
    pub fn record(&mut self, position: usize) -> bool {
        self.positions.insert(position)
    }

    /// Forget every reveal.
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

/// Check `choice` against the question at `position`.
///
/// Does not look at reveal state: guarding against repeat answers is the
/// controller's job.
pub fn submit_answer(
    questions: &[Question],
    position: usize,
    choice: Choice,
) -> Result<bool, ScoringError> {
    let question = questions
        .get(position)
        .ok_or(ScoringError::InvalidPosition {
            position,
            len: questions.len(),
        })?;
    Ok(question.correct_choice == choice)
}

/// Add `position` to `reveals`, doing nothing when already present.
pub fn record_reveal(reveals: &mut RevealSet, position: usize) {
    reveals.record(position);
}

/// True once every keyword position has been revealed.
pub fn is_complete(reveals: &RevealSet, keyword_len: usize) -> bool {
    reveals.len() == keyword_len
}
