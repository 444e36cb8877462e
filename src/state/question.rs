//! Question records produced by the generator and their binding to keyword positions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::keyword::Keyword;

/// School grade the questions are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    /// Grade 10.
    #[default]
    #[serde(rename = "10")]
    Ten,
    /// Grade 11.
    #[serde(rename = "11")]
    Eleven,
    /// Grade 12.
    #[serde(rename = "12")]
    Twelve,
}

impl Grade {
    /// Numeric grade level.
    pub fn level(self) -> u8 {
        match self {
            Grade::Ten => 10,
            Grade::Eleven => 11,
            Grade::Twelve => 12,
        }
    }
}

/// One of the four fixed answer labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Choice {
    /// Option A.
    A,
    /// Option B.
    B,
    /// Option C.
    C,
    /// Option D.
    D,
}

impl Choice {
    /// Every label in display order.
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];
}

/// Option text keyed by label; all four labels are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChoiceOptions {
    /// Option `A`.
    #[serde(rename = "A")]
    pub a: String,
    /// Option `B`.
    #[serde(rename = "B")]
    pub b: String,
    /// Option `C`.
    #[serde(rename = "C")]
    pub c: String,
    /// Option `D`.
    #[serde(rename = "D")]
    pub d: String,
}

impl ChoiceOptions {
    /// Text displayed for `choice`.
    pub fn get(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.a,
            Choice::B => &self.b,
            Choice::C => &self.c,
            Choice::D => &self.d,
        }
    }
}

/// Multiple-choice question as returned by the question generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Question prompt.
    pub text: String,
    /// Answer options.
    pub options: ChoiceOptions,
    /// Label of the correct option.
    pub correct_answer: Choice,
}

/// A question bound to one canonical keyword position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Index of the keyword letter this question unlocks.
    pub position: usize,
    /// The letter itself.
    pub keyword_char: char,
    /// Question text.
    pub prompt: String,
    /// The four labelled options.
    pub options: ChoiceOptions,
    /// Label of the right option; never sent to clients.
    pub correct_choice: Choice,
}

/// Question list does not line up with the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} questions (one per keyword letter), got {actual}")]
pub struct QuestionCountMismatch {
    /// Keyword length.
    pub expected: usize,
    /// Records supplied.
    pub actual: usize,
}

/// Zip records with the keyword letters, assigning positions `0..len`.
pub fn bind_questions(
    keyword: &Keyword,
    records: Vec<QuestionRecord>,
) -> Result<Vec<Question>, QuestionCountMismatch> {
    if records.len() != keyword.len() {
        return Err(QuestionCountMismatch {
            expected: keyword.len(),
            actual: records.len(),
        });
    }

    Ok(records
        .into_iter()
        .zip(keyword.chars().iter().copied())
        .enumerate()
        .map(|(position, (record, keyword_char))| Question {
            position,
            keyword_char,
            prompt: record.text,
            options: record.options,
            correct_choice: record.correct_answer,
        })
        .collect())
}

#[cfg(test)]
pub(crate) fn sample_record(correct: Choice) -> QuestionRecord {
    QuestionRecord {
        text: "Which device stores data permanently?".into(),
        options: ChoiceOptions {
            a: "RAM".into(),
            b: "Hard disk".into(),
            c: "Cache".into(),
            d: "Register".into(),
        },
        correct_answer: correct,
    }
}
