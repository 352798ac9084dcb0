//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter. The
//! mapping to wall-clock pacing is advisory only (`ms_per_tick` in
//! [`SimConfig`]): it never affects the semantics of the algorithm, only how
//! long a driver sleeps between ticks when played back in real time.
//!
//! Using an integer tick as the canonical time unit means all scheduling
//! arithmetic (`hard_stop_on_tick`, `simulation_ticks`) is exact — no
//! floating-point drift, O(1) comparisons.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// A sentinel meaning "never" when used as a scheduled-stop tick — see
    /// the "hard_stop_on_tick with None value" design note: absence of a
    /// scheduled stop is represented as this sentinel, not `Option<Tick>`,
    /// so the `tick_n >= hard_stop_on_tick` comparison is always well-formed.
    pub const NEVER: Tick = Tick(u64::MAX);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and the advisory wall-clock pacing.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many advisory milliseconds one tick represents (pacing only).
    pub ms_per_tick: u32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(ms_per_tick: u32) -> Self {
        Self { ms_per_tick, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Advisory elapsed milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.ms_per_tick as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms elapsed)", self.current_tick, self.elapsed_ms())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Per-node arrays (`initial_liveness`, `hard_stop_on_tick`) are supplied
/// separately to the node store builder in `tdsim-node`, since their length
/// is tied to the node count, not to this crate's global knobs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Wall-clock pacing between ticks, in milliseconds (advisory only).
    pub ms_per_tick: u32,

    /// Total ticks to simulate before clock expiry forces every node to exit.
    pub simulation_ticks: u64,

    /// Probability, in `[0, 1]`, that an ACTIVE node emits a basic message
    /// to a random alive peer during a given tick.
    pub communication_on_active_prob: f64,

    /// Lower bound of the uniform re-arm sample applied to
    /// `alive_for_next_ticks` when a node receives basic messages.
    pub min_activeness_after_receive: u32,

    /// Upper bound of the uniform re-arm sample (inclusive). Must be
    /// `>= min_activeness_after_receive`.
    pub max_activeness_after_receive: u32,

    /// Maximum basic messages drained from a node's queue per tick.
    pub node_package_process_per_tick: usize,

    /// Consecutive PASSIVE ticks before a node is forced to exit the tree.
    pub passiveness_death_thresh: u32,

    /// If true, only the root starts with nonzero initial liveness; all
    /// other nodes start PASSIVE with `alive_for_next_ticks = 0`.
    pub only_root_alive_initially: bool,

    /// Master RNG seed. The same seed always produces identical results.
    pub seed: u64,

    /// Write statistics output every N ticks. 1 = every tick.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.simulation_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.ms_per_tick)
    }
}
