use crate::host::{Host, Tick};
use crate::policy::{DispatchOutcome, SchedulingPolicy};
use crate::scheduler::Core;
use crate::thread::ThreadId;
use log::debug;

/// A thread that has held the processor for this long or less keeps it
/// unconditionally, so sub-threshold dispatches cannot thrash.
const CONTINUE_WINDOW: Tick = 2;

/// Preemptive shortest-estimated-burst.
///
/// The running thread is preempted when some ready thread's estimated burst
/// is shorter than the time the running thread has already held the
/// processor. No quantum timer is armed; preemption is driven entirely by
/// the burst estimates.
///
/// Two quirks are part of the policy's contract and pinned by tests:
/// among several qualifying ready threads the *last* one in queue order
/// wins (not the global minimum), and the preempted thread is left ready
/// but not re-enqueued, so only a later dispatch path can pick it back up.
pub struct ShortestBurst;

impl ShortestBurst {
    pub fn new() -> Self {
        Self
    }

    /// Decide the running thread's fate. `None` means the context named a
    /// thread the table no longer knows; the caller clears it and fills the
    /// processor from the queue.
    fn consider_preempt(
        &mut self,
        running: ThreadId,
        core: &mut Core,
        host: &mut dyn Host,
    ) -> Option<DispatchOutcome> {
        let elapsed = match core.threads.get(&running) {
            Some(tcb) => host.now().saturating_sub(tcb.last_dispatch),
            None => {
                core.context.clear();
                return None;
            }
        };
        if elapsed <= CONTINUE_WINDOW {
            return Some(DispatchOutcome::Scheduled);
        }

        // Last qualifying match in queue order wins.
        let mut candidate = None;
        for (idx, id) in core.ready.iter().enumerate() {
            if let Some(tcb) = core.threads.get(&id) {
                if tcb.estimated_burst < elapsed {
                    candidate = Some(idx);
                }
            }
        }

        let Some(idx) = candidate else {
            return Some(DispatchOutcome::Scheduled);
        };
        core.evict_current(host);
        if let Some(next) = core.ready.remove_at(idx) {
            debug!("preempt: thread {next} displaces {running} after {elapsed} ticks");
            core.stats.preemptions += 1;
            core.install(next, host);
        }
        Some(DispatchOutcome::Scheduled)
    }
}

impl Default for ShortestBurst {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingPolicy for ShortestBurst {
    fn dispatch(&mut self, core: &mut Core, host: &mut dyn Host) -> DispatchOutcome {
        if let Some(running) = core.current() {
            if let Some(outcome) = self.consider_preempt(running, core, host) {
                return outcome;
            }
        }

        match core.ready.take_head() {
            Some(next) => {
                core.install(next, host);
                DispatchOutcome::Scheduled
            }
            None => {
                core.go_idle();
                DispatchOutcome::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use crate::sim::SimHost;
    use crate::thread::ThreadStatus;

    fn sb_scheduler() -> Scheduler {
        Scheduler::new(Box::new(ShortestBurst::new()))
    }

    #[test]
    fn test_idle_processor_takes_queue_head_without_timer() {
        let mut host = SimHost::new(0);
        host.add_task(0, 0);
        let mut sched = sb_scheduler();
        let a = sched.insert_ready(0, 0);
        sched.insert_ready(0, 0);

        assert_eq!(sched.dispatch(&mut host), DispatchOutcome::Scheduled);
        assert_eq!(sched.current(), Some(a));
        assert_eq!(sched.core().threads[&a].last_dispatch, host.clock);
        // estimate-driven policy never arms the quantum timer
        assert_eq!(host.armed, None);
    }

    #[test]
    fn test_within_continue_window_nothing_moves() {
        let mut host = SimHost::new(0);
        host.add_task(0, 0);
        let mut sched = sb_scheduler();
        let a = sched.insert_ready(0, 0);
        let b = sched.insert_ready(0, 0);
        sched.dispatch(&mut host);
        sched.core_mut().threads.get_mut(&b).unwrap().estimated_burst = 5;

        // elapsed is exactly the window, which is not enough to preempt
        host.advance(CONTINUE_WINDOW);
        assert_eq!(sched.dispatch(&mut host), DispatchOutcome::Scheduled);
        assert_eq!(sched.current(), Some(a));
        assert!(sched.core().ready.contains(b));
    }

    #[test]
    fn test_shorter_estimate_preempts_and_victim_is_not_requeued() {
        let mut host = SimHost::new(0);
        host.add_task(0, 0);
        let mut sched = sb_scheduler();
        let a = sched.insert_ready(0, 0);
        let b = sched.insert_ready(0, 0);
        sched.dispatch(&mut host);

        // b predicts a burst shorter than a's elapsed time
        sched.core_mut().threads.get_mut(&b).unwrap().estimated_burst = 5;
        host.advance(12);
        assert_eq!(sched.dispatch(&mut host), DispatchOutcome::Scheduled);
        assert_eq!(sched.current(), Some(b));
        assert_eq!(sched.core().threads[&b].last_dispatch, 12);
        // documented quirk: a is ready again but not back on the queue
        assert_eq!(sched.status(a), Some(ThreadStatus::Ready));
        assert!(!sched.core().ready.contains(a));
        assert_eq!(sched.stats().preemptions, 1);
    }

    #[test]
    fn test_no_qualifying_estimate_keeps_running_thread() {
        let mut host = SimHost::new(0);
        host.add_task(0, 0);
        let mut sched = sb_scheduler();
        let a = sched.insert_ready(0, 0);
        sched.insert_ready(0, 0);
        sched.dispatch(&mut host);

        // default estimates are 10, elapsed is 8: nobody qualifies
        host.advance(8);
        assert_eq!(sched.dispatch(&mut host), DispatchOutcome::Scheduled);
        assert_eq!(sched.current(), Some(a));
        assert_eq!(sched.stats().preemptions, 0);
    }

    #[test]
    fn test_last_qualifying_match_wins() {
        let mut host = SimHost::new(0);
        host.add_task(0, 0);
        let mut sched = sb_scheduler();
        let a = sched.insert_ready(0, 0);
        let b = sched.insert_ready(0, 0);
        let c = sched.insert_ready(0, 0);
        sched.dispatch(&mut host);

        // b has the smaller estimate, but c also qualifies and sits later
        // in the queue; the documented quirk picks c
        sched.core_mut().threads.get_mut(&b).unwrap().estimated_burst = 5;
        sched.core_mut().threads.get_mut(&c).unwrap().estimated_burst = 9;
        host.advance(12);
        sched.dispatch(&mut host);
        assert_eq!(sched.current(), Some(c));
        assert!(sched.core().ready.contains(b));
        assert_eq!(sched.status(a), Some(ThreadStatus::Ready));
    }
}
