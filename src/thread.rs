use crate::burst::INITIAL_ESTIMATE;
use crate::host::{TaskId, Tick};

/// Identifier of a thread. Ids are handed out by the scheduler and never
/// reused within one scheduler instance.
pub type ThreadId = usize;

/// Lifecycle state of a thread.
///
/// `Waiting` carries a nesting depth: suspending an already-waiting thread
/// stacks another level, and each resume peels one off. `depth` is always
/// at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Ready,
    Running,
    Waiting { depth: u32 },
    Killed,
}

impl ThreadStatus {
    pub fn is_waiting(&self) -> bool {
        matches!(self, ThreadStatus::Waiting { .. })
    }
}

/// Thread control block: the scheduler's record for one simulated thread.
#[derive(Debug, Clone)]
pub struct Tcb {
    pub status: ThreadStatus,
    /// Inherited from the owning task at creation. Carried for the host's
    /// benefit; no scheduling order depends on it.
    pub priority: i32,
    /// Back-reference to the owning task.
    pub task: TaskId,
    /// Length of the most recent completed CPU burst.
    pub last_burst: Tick,
    /// Smoothed prediction of the next CPU burst, never below the estimator
    /// floor.
    pub estimated_burst: Tick,
    /// Time of the most recent switch onto the processor.
    pub last_dispatch: Tick,
}

impl Tcb {
    /// A freshly created thread starts ready, with the burst predictor
    /// seeded at the initial estimate.
    pub fn new(task: TaskId, priority: i32) -> Self {
        Self {
            status: ThreadStatus::Ready,
            priority,
            task,
            last_burst: INITIAL_ESTIMATE,
            estimated_burst: INITIAL_ESTIMATE,
            last_dispatch: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tcb_is_ready_with_seeded_estimate() {
        let tcb = Tcb::new(3, 7);
        assert_eq!(tcb.status, ThreadStatus::Ready);
        assert_eq!(tcb.task, 3);
        assert_eq!(tcb.priority, 7);
        assert_eq!(tcb.last_burst, 10);
        assert_eq!(tcb.estimated_burst, 10);
    }

    #[test]
    fn test_waiting_detection() {
        assert!(ThreadStatus::Waiting { depth: 1 }.is_waiting());
        assert!(ThreadStatus::Waiting { depth: 4 }.is_waiting());
        assert!(!ThreadStatus::Ready.is_waiting());
        assert!(!ThreadStatus::Running.is_waiting());
        assert!(!ThreadStatus::Killed.is_waiting());
    }
}
