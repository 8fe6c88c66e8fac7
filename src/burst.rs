//! CPU-burst prediction.
//!
//! Every time a thread leaves the processor through suspend or kill, the
//! length of the burst it just finished is folded into a smoothed per-thread
//! estimate. The preemptive policy compares these estimates against the
//! running thread's elapsed time to decide preemption.

use crate::host::Tick;

/// Seed value for both `last_burst` and `estimated_burst` on a new thread.
pub const INITIAL_ESTIMATE: Tick = 10;

/// Lower bound on the estimate. Without it, a thread that once ran for a
/// near-zero burst would be predicted at ~0 forever and preempt everything.
pub const MIN_ESTIMATE: Tick = 5;

// Weighting of the just-observed burst vs. accumulated history. The heavy
// recent weight is deliberate: the predictor chases recent behavior.
const RECENT_WEIGHT: f64 = 0.75;
const HISTORY_WEIGHT: f64 = 0.25;

/// Fold one observed burst into the running estimate:
/// `floor(0.75 * last + 0.25 * estimate)`, floored at [`MIN_ESTIMATE`].
pub fn smooth(last_burst: Tick, estimate: Tick) -> Tick {
    let blended = RECENT_WEIGHT * last_burst as f64 + HISTORY_WEIGHT * estimate as f64;
    (blended.floor() as Tick).max(MIN_ESTIMATE)
}
