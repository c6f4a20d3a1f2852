use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Generator;
use crate::errors::GenerationError;

/// Entropy drawn from a process-local ChaCha stream.
///
/// Holds a cursor into its stream, so one instance belongs to one worker.
#[derive(Debug, Clone)]
pub struct RandomBytes {
    rng: ChaCha8Rng,
    size: usize,
}

impl RandomBytes {
    /// Stream keyed with a full 256-bit seed from the thread-local OS-seeded rng.
    pub fn new(size: usize) -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
            size,
        }
    }

    /// Reproducible stream, used by tests.
    pub fn with_seed(seed: u64, size: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            size,
        }
    }
}

impl Generator for RandomBytes {
    fn size(&self) -> usize {
        self.size
    }

    fn generate(&mut self, _seed: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let mut bytes = vec![0_u8; self.size];
        self.rng.fill_bytes(&mut bytes);
        Ok(bytes)
    }
}
