mod round_robin;
mod shortest_burst;
pub use round_robin::{RoundRobin, QUANTUM};
pub use shortest_burst::ShortestBurst;

use crate::host::Host;
use crate::scheduler::Core;

/// Result of one dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A thread occupies the processor (either kept or newly installed).
    Scheduled,
    /// Nothing to run; the processor was left idle.
    Idle,
}

/// Dispatcher policy: decides which thread occupies the processor.
///
/// Every lifecycle operation ends with one `dispatch` call, so an
/// implementation is re-entered from many call sites and must leave the
/// core consistent (at most one running thread, matching the processor
/// context) on every return path.
pub trait SchedulingPolicy {
    fn dispatch(&mut self, core: &mut Core, host: &mut dyn Host) -> DispatchOutcome;
}
