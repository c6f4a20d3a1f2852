//! Entropy sources for transformers.

mod hash;
mod random;

pub use hash::HashBytes;
pub use random::RandomBytes;

use crate::errors::{ConfigurationError, GenerationError};

/// Produces fixed-length entropy for one value.
pub trait Generator: Send {
    /// Number of bytes every successful call returns.
    fn size(&self) -> usize;

    /// Produce entropy for `seed`. Random generators ignore the seed.
    fn generate(&mut self, seed: &[u8]) -> Result<Vec<u8>, GenerationError>;
}

/// Strategy used to produce entropy bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    Random,
    Hash,
}

impl EngineKind {
    pub const EXPECTED: &'static str = "random, hash";

    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        match value {
            "random" => Ok(EngineKind::Random),
            "hash" => Ok(EngineKind::Hash),
            other => Err(ConfigurationError::InvalidEnum {
                param: "engine",
                value: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Random => "random",
            EngineKind::Hash => "hash",
        }
    }
}

/// Build the generator for `engine` producing `size` bytes per call.
pub fn build(
    engine: EngineKind,
    size: usize,
    salt: Option<&[u8]>,
) -> Result<Box<dyn Generator>, ConfigurationError> {
    match engine {
        EngineKind::Random => Ok(Box::new(RandomBytes::new(size))),
        EngineKind::Hash => Ok(Box::new(HashBytes::new(salt.unwrap_or_default(), size)?)),
    }
}
