//! Student roster for the "blind bag" picker: parsing and draw-without-replacement.

use rand::Rng;
use thiserror::Error;

/// Raised when a draw is attempted after every name has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the student roster is empty")]
pub struct EmptyRoster;

/// Ordered list of student names still eligible for the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster from already-clean names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse raw free text into a roster, see [`parse_roster`].
    pub fn parse(raw: &str) -> Self {
        Self::new(parse_roster(raw))
    }

    /// Names still in the bag, in their original order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names left to draw.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether every name has been drawn.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Draw a random name and remove it from the roster.
    pub fn draw(&mut self) -> Result<String, EmptyRoster> {
        self.draw_with_rng(&mut rand::rng())
    }

    /// Draw using the provided generator.
    ///
    /// Only the drawn entry is removed: duplicate names stay in the bag.
    pub fn draw_with_rng<R: Rng>(&mut self, rng: &mut R) -> Result<String, EmptyRoster> {
        if self.names.is_empty() {
            return Err(EmptyRoster);
        }
        let index = rng.random_range(0..self.names.len());
        Ok(self.names.remove(index))
    }
}

/// Split on any run of newlines, commas and semicolons, trim, and drop empty entries.
pub fn parse_roster(raw: &str) -> Vec<String> {
    raw.split(['\n', '\r', ',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Pure variant of [`Roster::draw_with_rng`] returning the pick and the remaining names.
pub fn draw_random<R: Rng>(
    roster: &[String],
    rng: &mut R,
) -> Result<(String, Vec<String>), EmptyRoster> {
    let mut remaining = Roster::new(roster.to_vec());
    let picked = remaining.draw_with_rng(rng)?;
    Ok((picked, remaining.names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn parse_splits_on_all_separators() {
        assert_eq!(parse_roster("Anh, Binh;\nChi\n\n"), vec!["Anh", "Binh", "Chi"]);
    }

    #[test]
    fn parse_handles_windows_line_endings_and_blank_tokens() {
        assert_eq!(
            parse_roster("  Dung \r\n;;, ,\r\nGiang"),
            vec!["Dung", "Giang"]
        );
        assert!(parse_roster(" \n ; , ").is_empty());
        assert!(parse_roster("").is_empty());
    }

    #[test]
    fn parse_keeps_inner_spaces() {
        assert_eq!(
            parse_roster("Nguyen Van An\nTran Thi Bich"),
            vec!["Nguyen Van An", "Tran Thi Bich"]
        );
    }

    #[test]
    fn draw_removes_exactly_one_duplicate() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let roster = vec!["Anh".to_string(), "Binh".to_string(), "Anh".to_string()];
            let (picked, remaining) = draw_random(&roster, &mut rng).unwrap();
            assert!(picked == "Anh" || picked == "Binh");
            assert_eq!(remaining.len(), 2);
            if picked == "Anh" {
                assert_eq!(remaining.iter().filter(|n| *n == "Anh").count(), 1);
                assert_eq!(remaining.iter().filter(|n| *n == "Binh").count(), 1);
            } else {
                assert_eq!(remaining, vec!["Anh", "Anh"]);
            }
        }
    }

    #[test]
    fn drawing_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut roster = Roster::parse("Anh\nBinh\nChi");
        let mut picked = Vec::new();
        while let Ok(name) = roster.draw_with_rng(&mut rng) {
            picked.push(name);
        }
        picked.sort();
        assert_eq!(picked, vec!["Anh", "Binh", "Chi"]);
        assert!(roster.is_empty());
        assert_eq!(roster.draw(), Err(EmptyRoster));
    }

    #[test]
    fn draw_from_empty_slice_fails() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(draw_random(&[], &mut rng), Err(EmptyRoster));
    }
}
