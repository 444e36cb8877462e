//! Fisher–Yates shuffling used to scramble the keyword tiles.

use rand::Rng;

/// Return a uniformly shuffled copy of `items`, leaving the input untouched.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    shuffled_with_rng(items, &mut rand::rng())
}

/// Same as [`shuffled`] but drawing randomness from the provided generator.
///
/// Performs the classic backward pass: for `i` from `n - 1` down to `1`, swap
/// element `i` with an element picked uniformly from `0..=i`.
pub fn shuffled_with_rng<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..40usize {
            let input: Vec<usize> = (0..n).collect();
            let mut output = shuffled_with_rng(&input, &mut rng);
            assert_eq!(output.len(), n);
            output.sort_unstable();
            assert_eq!(output, input);
        }
    }

    #[test]
    fn empty_and_single_are_unchanged() {
        let empty: Vec<u8> = Vec::new();
        assert!(shuffled(&empty).is_empty());
        assert_eq!(shuffled(&[42]), vec![42]);
    }

    #[test]
    fn input_is_not_modified() {
        let input = vec!['A', 'B', 'C', 'D'];
        let _ = shuffled(&input);
        assert_eq!(input, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn every_ordering_of_three_shows_up() {
        let mut rng = StdRng::seed_from_u64(2024);
        let input = [0, 1, 2];
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            *counts.entry(shuffled_with_rng(&input, &mut rng)).or_insert(0u32) += 1;
        }

        assert_eq!(counts.len(), 6);
        // 1000 expected per ordering; anything this far off means a biased pass.
        assert!(counts.values().all(|&c| (700..=1300).contains(&c)), "{counts:?}");
    }
}
