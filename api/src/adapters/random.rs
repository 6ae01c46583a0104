//! Random shuffles for reviewer selection

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::entities::UserId;
use crate::domain::selection::Shuffle;

/// Shuffles with the calling thread's generator
pub struct ThreadRngShuffle;

impl Shuffle for ThreadRngShuffle {
    fn shuffle(&self, ids: &mut [UserId]) {
        ids.shuffle(&mut rand::thread_rng());
    }
}

/// Shuffles with a seeded generator so assignments can be replayed
pub struct SeededShuffle {
    rng: Mutex<StdRng>,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffle for SeededShuffle {
    fn shuffle(&self, ids: &mut [UserId]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ids.shuffle(&mut *rng);
    }
}
