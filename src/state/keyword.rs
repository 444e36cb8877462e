//! Keyword normalisation and the mapping between scrambled tiles and canonical letters.

use thiserror::Error;

use crate::state::{shuffle::shuffled, state_machine::GameStatus};

/// Errors raised while normalising the keyword typed by the instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeywordError {
    /// Nothing is left once whitespace is stripped.
    #[error("keyword is empty once whitespace is removed")]
    Empty,
}

/// Uppercase keyword with every whitespace character removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    chars: Vec<char>,
}

impl Keyword {
    /// Number of letters, which is also the number of tiles and questions.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the keyword has no letters; never true after normalisation.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Letter at a canonical position.
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    /// Letters in canonical (reading) order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Keyword rendered as a string.
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Strip all whitespace and uppercase the rest.
pub fn normalize_keyword(raw: &str) -> Result<Keyword, KeywordError> {
    let chars: Vec<char> = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if chars.is_empty() {
        return Err(KeywordError::Empty);
    }

    Ok(Keyword { chars })
}

/// Permutation mapping display slot to canonical position, with its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    /// `order[slot] == position`
    order: Vec<usize>,
    /// `slots[position] == slot`
    slots: Vec<usize>,
}

impl TileLayout {
    fn from_permutation(order: Vec<usize>) -> Self {
        let mut slots = vec![0; order.len()];
        for (slot, &position) in order.iter().enumerate() {
            slots[position] = slot;
        }
        Self { order, slots }
    }

    /// Canonical position shown in `slot`.
    pub fn position_at(&self, slot: usize) -> Option<usize> {
        self.order.get(slot).copied()
    }

    /// Display slot currently holding the canonical `position`.
    pub fn slot_of(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the layout has no slots.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Slot-to-position table.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[cfg(test)]
    pub(crate) fn from_order(order: Vec<usize>) -> Self {
        Self::from_permutation(order)
    }
}

/// Fresh shuffle of `0..keyword.len()`.
pub fn init_layout(keyword: &Keyword) -> TileLayout {
    let identity: Vec<usize> = (0..keyword.len()).collect();
    TileLayout::from_permutation(shuffled(&identity))
}

/// Letter shown in a display slot for the given status.
///
/// During play the slot shows the letter of the canonical position it holds;
/// once solved the board is re-sorted and slot `i` shows `keyword[i]`. Returns
/// `None` for out-of-range slots and while in [`GameStatus::Setup`].
pub fn display_char_at(
    slot: usize,
    layout: &TileLayout,
    keyword: &Keyword,
    status: GameStatus,
) -> Option<char> {
    match status {
        GameStatus::Setup => None,
        GameStatus::Playing | GameStatus::Revealed => {
            keyword.char_at(layout.position_at(slot)?)
        }
        GameStatus::Solved => keyword.char_at(slot),
    }
}
