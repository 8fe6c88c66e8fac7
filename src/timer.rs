use crate::host::Host;
use crate::policy::DispatchOutcome;
use crate::scheduler::Scheduler;

/// Quantum-expiry interrupt handler. Stateless: its whole job is to route
/// the external timer event into the dispatcher.
pub struct TimerInterrupt;

impl TimerInterrupt {
    pub fn handle(scheduler: &mut Scheduler, host: &mut dyn Host) -> DispatchOutcome {
        scheduler.dispatch(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RoundRobin;
    use crate::sim::SimHost;

    #[test]
    fn test_interrupt_runs_the_dispatcher() {
        let mut host = SimHost::new(0);
        let mut sched = Scheduler::new(Box::new(RoundRobin::new()));
        assert_eq!(
            TimerInterrupt::handle(&mut sched, &mut host),
            DispatchOutcome::Idle
        );
        assert_eq!(sched.stats().dispatches, 1);
    }
}
