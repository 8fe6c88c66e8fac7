use crate::thread::ThreadId;

/// Identifier of a task (the owning process of one or more threads).
pub type TaskId = usize;

/// Simulated time, in abstract CPU-time units.
pub type Tick = u64;

/// Opaque address-space handle, passed through from the owning task to the
/// processor context on dispatch. The scheduler never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace(pub u64);

/// Everything the scheduler asks of the surrounding simulation: the clock,
/// the quantum timer, task bookkeeping, the device registry, and the
/// resource manager. The scheduler owns none of this state; it only calls
/// through this trait.
///
/// Task lookups return `Option` because a task can be absent (already
/// terminated) at any call site; absence is a normal outcome, not an error.
pub trait Host {
    /// Current simulated time.
    fn now(&self) -> Tick;

    /// Arm the interval timer to force a dispatch after `quantum` ticks.
    fn arm_quantum(&mut self, quantum: Tick);

    fn task_priority(&self, task: TaskId) -> i32;

    /// Number of live threads in `task`, or `None` if the task is absent.
    fn task_thread_count(&self, task: TaskId) -> Option<usize>;

    /// Attach `thread` to `task`. Returns false if the task refuses
    /// (terminated, or the thread-count ceiling was hit in between).
    fn task_add_thread(&mut self, task: TaskId, thread: ThreadId) -> bool;

    fn task_remove_thread(&mut self, task: TaskId, thread: ThreadId);

    fn task_current(&self, task: TaskId) -> Option<ThreadId>;

    fn task_set_current(&mut self, task: TaskId, thread: Option<ThreadId>);

    fn task_page_table(&self, task: TaskId) -> AddressSpace;

    /// Terminate `task`. Called when a kill drains its last thread.
    fn task_kill(&mut self, task: TaskId);

    /// Number of devices in the device registry.
    fn device_count(&self) -> usize;

    /// Purge `thread`'s pending I/O requests from one device's queue.
    fn cancel_pending_io(&mut self, device: usize, thread: ThreadId);

    /// Release every resource held by `thread`.
    fn giveup_resources(&mut self, thread: ThreadId);
}

/// An event a thread can wait on. Registration is all the scheduler does;
/// the event engine wakes registered threads by calling resume on them when
/// the event fires.
pub trait WaitEvent {
    fn add_thread(&mut self, thread: ThreadId);
}
