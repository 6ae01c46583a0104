//! Reviewer selection
//!
//! Picks an unbiased random subset of candidates without replacement:
//! shuffle the whole candidate list, then truncate. Randomness is an
//! injected capability so callers decide where entropy comes from.

use std::collections::HashSet;

use super::entities::UserId;

/// Source of random permutations
pub trait Shuffle: Send + Sync {
    /// Permute `ids` in place
    fn shuffle(&self, ids: &mut [UserId]);
}

/// Select up to `max` distinct ids from `candidates` in random order.
///
/// Duplicate candidates are collapsed before shuffling, so every distinct
/// id has the same chance of being picked.
pub fn select_random(candidates: Vec<UserId>, max: usize, shuffle: &dyn Shuffle) -> Vec<UserId> {
    if max == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::with_capacity(candidates.len());
    let mut pool: Vec<UserId> = candidates
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if pool.is_empty() {
        return pool;
    }

    shuffle.shuffle(&mut pool);
    pool.truncate(max);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{NoShuffle, ReverseShuffle};

    fn ids(raw: &[&str]) -> Vec<UserId> {
        raw.iter().map(|s| UserId::from(*s)).collect()
    }

    #[test]
    fn empty_candidates_yield_empty() {
        assert!(select_random(Vec::new(), 2, &NoShuffle).is_empty());
    }

    #[test]
    fn zero_max_yields_empty() {
        assert!(select_random(ids(&["u2", "u3"]), 0, &NoShuffle).is_empty());
    }

    #[test]
    fn fewer_candidates_than_max_returns_all_permuted() {
        let picked = select_random(ids(&["u2", "u3"]), 5, &ReverseShuffle);
        assert_eq!(picked, ids(&["u3", "u2"]));
    }

    #[test]
    fn truncates_after_shuffle() {
        let picked = select_random(ids(&["u2", "u3", "u5"]), 2, &NoShuffle);
        assert_eq!(picked, ids(&["u2", "u3"]));

        let picked = select_random(ids(&["u2", "u3", "u5"]), 2, &ReverseShuffle);
        assert_eq!(picked, ids(&["u5", "u3"]));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let picked = select_random(ids(&["u2", "u2", "u3"]), 3, &NoShuffle);
        assert_eq!(picked, ids(&["u2", "u3"]));
    }
}
