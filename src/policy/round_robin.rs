use crate::host::{Host, Tick};
use crate::policy::{DispatchOutcome, SchedulingPolicy};
use crate::scheduler::Core;

/// Fixed time slice armed after every successful dispatch.
pub const QUANTUM: Tick = 50;

/// Cooperative round-robin with a fixed quantum.
///
/// Every dispatch demotes the running thread to the tail of the ready queue
/// and installs the head, so threads rotate on each scheduling event; the
/// quantum timer guarantees a dispatch happens even when nothing else does.
pub struct RoundRobin {
    quantum: Tick,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { quantum: QUANTUM }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingPolicy for RoundRobin {
    fn dispatch(&mut self, core: &mut Core, host: &mut dyn Host) -> DispatchOutcome {
        if let Some(demoted) = core.evict_current(host) {
            core.ready.append(demoted);
        }

        let Some(next) = core.ready.take_head() else {
            core.go_idle();
            return DispatchOutcome::Idle;
        };
        core.install(next, host);
        host.arm_quantum(self.quantum);
        DispatchOutcome::Scheduled
    }
}
