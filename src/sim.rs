//! Reference in-memory host.
//!
//! Stands in for the surrounding simulation engine: a manually advanced
//! clock, a task table, per-device pending-I/O sets, a resource-release log,
//! and events that resume their waiters when fired. Unit tests and the
//! policy-comparison bench drive the scheduler through this host.

use crate::host::{AddressSpace, Host, TaskId, Tick, WaitEvent};
use crate::scheduler::Scheduler;
use crate::thread::ThreadId;
use ahash::AHashMap;

/// One simulated task: the thread list, the current-thread link, and the
/// attributes the scheduler reads through the `Host` trait.
#[derive(Debug)]
pub struct SimTask {
    pub priority: i32,
    pub page_table: AddressSpace,
    pub threads: Vec<ThreadId>,
    pub current: Option<ThreadId>,
    pub killed: bool,
}

/// In-memory `Host` with a manually advanced clock.
pub struct SimHost {
    pub clock: Tick,
    pub tasks: AHashMap<TaskId, SimTask>,
    /// Pending I/O per device; kill must drain a thread from every one.
    pub pending_io: Vec<Vec<ThreadId>>,
    /// Every `cancel_pending_io` call, in order, for assertions.
    pub cancelled_io: Vec<(usize, ThreadId)>,
    /// Threads whose resources have been given up.
    pub released: Vec<ThreadId>,
    /// Most recently armed quantum, if any.
    pub armed: Option<Tick>,
    /// When set, tasks refuse `task_add_thread` (attachment race).
    pub refuse_attach: bool,
}

impl SimHost {
    pub fn new(devices: usize) -> Self {
        Self {
            clock: 0,
            tasks: AHashMap::new(),
            pending_io: vec![Vec::new(); devices],
            cancelled_io: Vec::new(),
            released: Vec::new(),
            armed: None,
            refuse_attach: false,
        }
    }

    pub fn add_task(&mut self, id: TaskId, priority: i32) {
        self.tasks.insert(
            id,
            SimTask {
                priority,
                page_table: AddressSpace(id as u64),
                threads: Vec::new(),
                current: None,
                killed: false,
            },
        );
    }

    pub fn advance(&mut self, ticks: Tick) {
        self.clock += ticks;
    }
}

impl Host for SimHost {
    fn now(&self) -> Tick {
        self.clock
    }

    fn arm_quantum(&mut self, quantum: Tick) {
        self.armed = Some(quantum);
    }

    fn task_priority(&self, task: TaskId) -> i32 {
        self.tasks.get(&task).map_or(0, |t| t.priority)
    }

    fn task_thread_count(&self, task: TaskId) -> Option<usize> {
        self.tasks.get(&task).map(|t| t.threads.len())
    }

    fn task_add_thread(&mut self, task: TaskId, thread: ThreadId) -> bool {
        if self.refuse_attach {
            return false;
        }
        match self.tasks.get_mut(&task) {
            Some(t) => {
                t.threads.push(thread);
                true
            }
            None => false,
        }
    }

    fn task_remove_thread(&mut self, task: TaskId, thread: ThreadId) {
        if let Some(t) = self.tasks.get_mut(&task) {
            t.threads.retain(|&id| id != thread);
        }
    }

    fn task_current(&self, task: TaskId) -> Option<ThreadId> {
        self.tasks.get(&task).and_then(|t| t.current)
    }

    fn task_set_current(&mut self, task: TaskId, thread: Option<ThreadId>) {
        if let Some(t) = self.tasks.get_mut(&task) {
            t.current = thread;
        }
    }

    fn task_page_table(&self, task: TaskId) -> AddressSpace {
        self.tasks.get(&task).map_or(AddressSpace(0), |t| t.page_table)
    }

    fn task_kill(&mut self, task: TaskId) {
        if let Some(t) = self.tasks.get_mut(&task) {
            t.killed = true;
        }
    }

    fn device_count(&self) -> usize {
        self.pending_io.len()
    }

    fn cancel_pending_io(&mut self, device: usize, thread: ThreadId) {
        if let Some(pending) = self.pending_io.get_mut(device) {
            pending.retain(|&id| id != thread);
        }
        self.cancelled_io.push((device, thread));
    }

    fn giveup_resources(&mut self, thread: ThreadId) {
        self.released.push(thread);
    }
}

/// Event that collects waiters and resumes them all when fired, the way the
/// external event engine wakes threads.
#[derive(Debug, Default)]
pub struct SimEvent {
    pub waiters: Vec<ThreadId>,
}

impl SimEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the event: resume every registered waiter, in registration
    /// order, and clear the wait set.
    pub fn fire(&mut self, scheduler: &mut Scheduler, host: &mut SimHost) {
        for id in self.waiters.drain(..) {
            scheduler.resume(id, host);
        }
    }
}

impl WaitEvent for SimEvent {
    fn add_thread(&mut self, thread: ThreadId) {
        self.waiters.push(thread);
    }
}
