//! Uniform random selection behind a trait, so tests can pin the outcome.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Chooses which candidates a preview shows.
pub trait Sampler: Send + Sync {
    /// Returns `min(cap, len)` distinct indices into `0..len`. Every subset of
    /// that size must be equally likely.
    fn choose_indices(&self, len: usize, cap: usize) -> Vec<usize>;
}

/// Production sampler backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn choose_indices(&self, len: usize, cap: usize) -> Vec<usize> {
        index::sample(&mut rand::thread_rng(), len, cap.min(len)).into_vec()
    }
}

/// Deterministic sampler for tests and reproducible seeding.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Sampler for SeededSampler {
    fn choose_indices(&self, len: usize, cap: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        index::sample(&mut *rng, len, cap.min(len)).into_vec()
    }
}

/// Picks up to `cap` items of `items` through `sampler`.
pub fn sample<T: Clone>(sampler: &dyn Sampler, items: &[T], cap: usize) -> Vec<T> {
    sampler
        .choose_indices(items.len(), cap)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}
