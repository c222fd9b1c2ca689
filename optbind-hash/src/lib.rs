//! Hashing primitives: sha256 hex digests and a length-prefixed cache-key builder.

use sha2::{Digest, Sha256};

/// Lowercase hex sha256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Incremental builder for cache keys.
///
/// Every field is written as `label`, length and bytes, so `("ab", "c")` and
/// `("a", "bc")` never collide.
#[derive(Clone, Default)]
pub struct CacheKeyBuilder {
    hasher: Sha256,
}

impl std::fmt::Debug for CacheKeyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheKeyBuilder").finish_non_exhaustive()
    }
}

impl CacheKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &str, value: impl AsRef<[u8]>) -> Self {
        self.push(label, value.as_ref());
        self
    }

    pub fn push(&mut self, label: &str, value: &[u8]) {
        self.write_chunk(label.as_bytes());
        self.write_chunk(value);
    }

    fn write_chunk(&mut self, bytes: &[u8]) {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
