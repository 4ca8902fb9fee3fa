//! Deterministic storage key derived from a candidate URL.

use std::fmt;

/// Fast, non-cryptographic checksum of a candidate URL.
///
/// Used as the on-disk key for cache entries. The value is a CRC-32 of the
/// URL bytes, so it is stable across runs, processes and platforms.
///
/// Collisions are possible and are not detected: two URLs with the same
/// checksum share a cache slot, and whichever was stored first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(u32);

impl ContentHash {
    /// Compute the hash of a URL string.
    pub fn of(url: &str) -> Self {
        Self(crc32fast::hash(url.as_bytes()))
    }

    /// Raw checksum value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
