//! Hash function mapping arbitrary keys onto an m-bit identifier.
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use sha1::Digest;
use sha1::Sha1;

/// Takes the low `bits` bits of the SHA-1 digest of a key.
///
/// The first four bytes of the digest are read as a big-endian signed
/// integer, its absolute value is taken (wrapping at `i32::MIN`), and the
/// result is masked to the ring's bit width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFunction {
    bits: u32,
    mask: u64,
}

impl HashFunction {
    /// Create a hash function producing values in `[0, 2^bits)`.
    pub fn new(bits: u32) -> Self {
        Self {
            bits,
            mask: (1u64 << bits) - 1,
        }
    }

    /// Hash a string key.
    pub fn hash(&self, value: &str) -> u64 {
        let mut hasher = Sha1::new();
        hasher.update(value.as_bytes());
        let digest = hasher.finalize();
        let head = i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        (head.wrapping_abs() as u32 as u64) & self.mask
    }

    /// Hash any displayable value through its string form, so numbers hash
    /// like their decimal representation.
    pub fn hash_of<T: Display>(&self, value: T) -> u64 {
        self.hash(&value.to_string())
    }

    /// Bit width of produced values.
    pub fn bits(&self) -> u32 {
        self.bits
    }
}
