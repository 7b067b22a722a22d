//! Constant variables.

/// Largest supported bit width. The identifier circle is precomputed,
/// so it holds 2^MAX_RING_BITS entries at most.
pub const MAX_RING_BITS: u32 = 20;
/// Upper bound of hops for a single routing walk or finger update chain.
pub const DEFAULT_MAX_HOPS: usize = 64;
/// Default timeout of a remote call in ms.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 3000;
