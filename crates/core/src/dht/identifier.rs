#![warn(missing_docs)]

//! This module defines identifiers of the chord ring.
//!
//! The ring is the cyclic group Z/2^m. Every point of it is an [Identifier],
//! and the [IdentifierCircle] precomputes all 2^m points once per ring size so
//! that peers and keys share the same immutable values.
//!
//! An [Identifier] also carries the hash of its index. The hash is informational
//! only: equality, ordering and hashing of identifiers look at the index alone.

use std::cmp::Ordering;
use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;

use super::hash::HashFunction;
use crate::consts::MAX_RING_BITS;
use crate::error::Error;
use crate::error::Result;

/// A point on the identifier circle.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Identifier {
    hash: u64,
    index: u64,
}

impl Identifier {
    pub(crate) fn new(hash: u64, index: u64) -> Self {
        Self { hash, index }
    }

    /// Position on the ring.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Hash of the position, derived when the circle was built.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Identifier {}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// The ordered set of all 2^m identifiers, with circular navigation.
#[derive(Clone, Debug)]
pub struct IdentifierCircle {
    bits: u32,
    identifiers: Vec<Identifier>,
}

impl IdentifierCircle {
    /// Precompute every identifier of a ring with `bits` bits.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_RING_BITS {
            return Err(Error::UnsupportedBitWidth(bits, MAX_RING_BITS));
        }
        let f = HashFunction::new(bits);
        let identifiers = (0..1u64 << bits)
            .map(|i| Identifier::new(f.hash_of(i), i))
            .collect();
        Ok(Self { bits, identifiers })
    }

    /// Number of identifiers on the circle, 2^m.
    pub fn size(&self) -> u64 {
        self.identifiers.len() as u64
    }

    /// Bit width m.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Identifier at position `i` taken modulo the circle size, so `at(-1)`
    /// is the last identifier and `at(i) == at(i + size)`.
    pub fn at(&self, i: i64) -> Identifier {
        let pos = i.rem_euclid(self.size() as i64);
        self.identifiers[pos as usize]
    }

    /// Identifier at an exact index in `[0, size)`.
    pub fn get(&self, index: u64) -> Result<Identifier> {
        self.identifiers
            .get(index as usize)
            .copied()
            .ok_or(Error::IdentifierIndexOutOfRange(index, self.size()))
    }

    /// Clockwise neighbour of `id`.
    pub fn next(&self, id: Identifier) -> Identifier {
        self.at(id.index as i64 + 1)
    }

    /// Counter-clockwise neighbour of `id`.
    pub fn last(&self, id: Identifier) -> Identifier {
        self.at(id.index as i64 - 1)
    }

    /// Move `id` by `delta` positions, clockwise for positive values.
    pub fn offset(&self, id: Identifier, delta: i64) -> Identifier {
        self.at(id.index as i64 + delta)
    }

    /// Iterate all identifiers from 0 upwards.
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.iter()
    }
}
