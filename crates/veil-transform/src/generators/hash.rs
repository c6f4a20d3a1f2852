use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::Generator;
use crate::errors::{ConfigurationError, GenerationError};

type HmacSha256 = Hmac<Sha256>;

/// Entropy derived from the seed with HMAC-SHA256 keyed by a salt.
///
/// Output block `i` is `HMAC(salt, be32(i) || seed)`; blocks are concatenated
/// and truncated to the configured size.
#[derive(Clone)]
pub struct HashBytes {
    mac: HmacSha256,
    size: usize,
}

impl HashBytes {
    pub fn new(salt: &[u8], size: usize) -> Result<Self, ConfigurationError> {
        let mac = HmacSha256::new_from_slice(salt).map_err(|err| {
            ConfigurationError::InvalidParam {
                param: "salt".to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(Self { mac, size })
    }

    /// Pure derivation behind [`Generator::generate`].
    pub fn derive(&self, seed: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size + 32);
        let mut counter: u32 = 0;
        while out.len() < self.size {
            let mut mac = self.mac.clone();
            mac.update(&counter.to_be_bytes());
            mac.update(seed);
            out.extend_from_slice(&mac.finalize().into_bytes());
            counter = counter.wrapping_add(1);
        }
        out.truncate(self.size);
        out
    }
}

impl std::fmt::Debug for HashBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashBytes")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Generator for HashBytes {
    fn size(&self) -> usize {
        self.size
    }

    fn generate(&mut self, seed: &[u8]) -> Result<Vec<u8>, GenerationError> {
        Ok(self.derive(seed))
    }
}
