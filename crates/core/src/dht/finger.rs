#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use super::interval::CircularInterval;
use crate::dht::Identifier;
use crate::error::Error;
use crate::error::Result;

/// Finger table of Chord DHT.
///
/// Entries are one-based. Entry `k` starts at `(owner + 2^(k-1)) mod 2^m` and
/// covers `[start(k), start(k+1))`. Entry 1 is the successor of the owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    owner: Identifier,
    bits: usize,
    ring_size: u64,
    finger: Vec<Option<Identifier>>,
}

impl FingerTable {
    /// builder
    pub fn new(owner: Identifier, bits: u32) -> Self {
        Self {
            owner,
            bits: bits as usize,
            ring_size: 1u64 << bits,
            finger: vec![None; bits as usize],
        }
    }

    fn check(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.bits {
            return Err(Error::FingerIndexOutOfRange(k, self.bits));
        }
        Ok(())
    }

    /// Number of entries, which is the bit width m.
    pub fn size(&self) -> usize {
        self.bits
    }

    /// Start index of entry `k`.
    pub fn start(&self, k: usize) -> Result<u64> {
        self.check(k)?;
        Ok(self.start_unchecked(k))
    }

    fn start_unchecked(&self, k: usize) -> u64 {
        (self.owner.index() + (1u64 << (k - 1))) % self.ring_size
    }

    /// Interval `[start(k), start(k+1))` covered by entry `k`.
    /// The last entry ends at the owner itself.
    pub fn interval(&self, k: usize) -> Result<CircularInterval<u64>> {
        self.check(k)?;
        let end = if k == self.bits {
            self.owner.index()
        } else {
            self.start_unchecked(k + 1)
        };
        Ok(CircularInterval::right_open(self.start_unchecked(k), end))
    }

    /// Node recorded in entry `k`, if any.
    pub fn node(&self, k: usize) -> Result<Option<Identifier>> {
        self.check(k)?;
        Ok(self.finger[k - 1])
    }

    /// setter
    pub fn set_node(&mut self, k: usize, node: Identifier) -> Result<()> {
        self.check(k)?;
        tracing::debug!("set finger of {} index: {} node: {}", self.owner, k, node);
        self.finger[k - 1] = Some(node);
        Ok(())
    }

    /// Point every entry to `node`.
    pub fn fill(&mut self, node: Identifier) {
        self.finger = vec![Some(node); self.bits];
    }

    /// The first entry.
    pub fn successor(&self) -> Option<Identifier> {
        self.finger.first().copied().flatten()
    }

    /// Clear every entry pointing to `node`, except the successor.
    /// The successor entry is only ever replaced, never cleared.
    pub fn remove(&mut self, node: Identifier) {
        for entry in self.finger.iter_mut().skip(1) {
            if *entry == Some(node) {
                tracing::debug!("remove {} from finger of {}", node, self.owner);
                *entry = None;
            }
        }
    }

    /// Check finger is contains some node
    pub fn contains(&self, v: Option<Identifier>) -> bool {
        self.finger.contains(&v)
    }

    /// Scan from entry m down to 1 and return the first node lying strictly
    /// between the owner and `id`. Falls back to the owner.
    pub fn closest_preceding(&self, id: Identifier) -> Identifier {
        let range = CircularInterval::open(self.owner, id);
        self.finger
            .iter()
            .rev()
            .flatten()
            .find(|node| range.contains(*node))
            .copied()
            .unwrap_or(self.owner)
    }

    /// get length of populated entries
    pub fn len(&self) -> usize {
        self.finger.iter().flatten().count()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// get finger list
    pub fn list(&self) -> &Vec<Option<Identifier>> {
        &self.finger
    }
}
