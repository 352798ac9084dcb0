//! Deterministic per-node and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each node gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (node_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive node IDs uniformly across the seed space. This
//! means:
//!
//! - Nodes never share RNG state (no contention, no ordering dependency).
//! - All RNG calls are local to the owning node; no synchronisation needed
//!   under the single-threaded tick driver.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::NodeId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── NodeRng ───────────────────────────────────────────────────────────────────

/// Per-node deterministic RNG.
///
/// Create one per node at simulation init; store in a parallel `Vec<NodeRng>`
/// alongside the other SoA arrays.
pub struct NodeRng(SmallRng);

impl NodeRng {
    /// Seed deterministically from the run's global seed and a node ID.
    pub fn new(global_seed: u64, node: NodeId) -> Self {
        let seed = global_seed ^ (node.0 as u64).wrapping_mul(MIXING_CONSTANT);
        NodeRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a non-empty slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations not tied to a single node.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
