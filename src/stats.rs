/// Counters accumulated across the life of one scheduler instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchedStats {
    /// Dispatcher entries, successful or not.
    pub dispatches: u64,
    /// Times a thread was installed on the processor.
    pub context_switches: u64,
    /// Times the preemptive policy evicted a running thread.
    pub preemptions: u64,
    /// Dispatches that left the processor idle.
    pub idle_dispatches: u64,
    pub threads_created: u64,
    pub threads_killed: u64,
    /// Burst samples folded into estimates (suspend and kill paths).
    pub bursts_recorded: u64,
}

impl SchedStats {
    pub fn new() -> Self {
        Self::default()
    }
}
