use crate::burst;
use crate::context::ProcessorContext;
use crate::host::{Host, TaskId, Tick, WaitEvent};
use crate::policy::{DispatchOutcome, SchedulingPolicy};
use crate::ready_queue::ReadyQueue;
use crate::stats::SchedStats;
use crate::thread::{Tcb, ThreadId, ThreadStatus};
use ahash::HashMapExt;
use log::{debug, warn};
use nohash_hasher::IntMap;

/// Default ceiling on live threads per task.
pub const MAX_THREADS_PER_TASK: usize = 10;

/// Mutable scheduling state shared between the lifecycle operations and the
/// policy: the thread table, the ready queue, and the processor context.
/// Nothing outside the scheduler writes to it.
pub struct Core {
    pub threads: IntMap<ThreadId, Tcb>,
    pub ready: ReadyQueue,
    pub context: ProcessorContext,
    pub stats: SchedStats,
}

impl Core {
    fn new() -> Self {
        Self {
            threads: IntMap::with_capacity(64),
            ready: ReadyQueue::new(),
            context: ProcessorContext::new(),
            stats: SchedStats::new(),
        }
    }

    /// Thread currently on the processor, if any.
    pub fn current(&self) -> Option<ThreadId> {
        self.context.current()
    }

    /// Install `id` on the processor: context, task's current-thread link,
    /// status, and dispatch timestamp.
    pub fn install(&mut self, id: ThreadId, host: &mut dyn Host) {
        let Some(tcb) = self.threads.get_mut(&id) else {
            return;
        };
        tcb.status = ThreadStatus::Running;
        tcb.last_dispatch = host.now();
        let task = tcb.task;
        self.context.set(id, host.task_page_table(task));
        host.task_set_current(task, Some(id));
        self.stats.context_switches += 1;
        debug!("dispatch: thread {id} (task {task}) on processor");
    }

    /// Take the running thread off the processor and mark it ready. The
    /// caller decides whether it goes back on the ready queue. Returns the
    /// evicted thread, or `None` on an idle processor.
    pub fn evict_current(&mut self, host: &mut dyn Host) -> Option<ThreadId> {
        let id = self.context.current()?;
        self.context.clear();
        if let Some(tcb) = self.threads.get_mut(&id) {
            tcb.status = ThreadStatus::Ready;
            let task = tcb.task;
            if host.task_current(task) == Some(id) {
                host.task_set_current(task, None);
            }
        }
        Some(id)
    }

    /// Leave the processor idle.
    pub fn go_idle(&mut self) {
        self.context.clear();
        self.stats.idle_dispatches += 1;
    }

    /// Fold the burst that ended at `now` into `id`'s estimate. Called on
    /// every suspend/kill transition out of `Running`.
    pub fn charge_burst(&mut self, id: ThreadId, now: Tick) {
        if let Some(tcb) = self.threads.get_mut(&id) {
            tcb.last_burst = now.saturating_sub(tcb.last_dispatch);
            tcb.estimated_burst = burst::smooth(tcb.last_burst, tcb.estimated_burst);
            self.stats.bursts_recorded += 1;
        }
    }

    pub fn status(&self, id: ThreadId) -> Option<ThreadStatus> {
        self.threads.get(&id).map(|t| t.status)
    }

    fn set_status(&mut self, id: ThreadId, status: ThreadStatus) {
        if let Some(tcb) = self.threads.get_mut(&id) {
            tcb.status = status;
        }
    }
}

/// The CPU-scheduling core: thread lifecycle plus a pluggable dispatcher.
///
/// The host simulation calls in on every scheduling event (creation, kill,
/// suspend, resume, timer interrupt); each lifecycle operation re-runs the
/// dispatcher before returning, so the "at most one running thread, and
/// exactly when the processor context is non-empty" invariant holds between
/// any two events. The whole subsystem is single-threaded by construction:
/// the host event engine serializes calls into it.
pub struct Scheduler {
    core: Core,
    policy: Box<dyn SchedulingPolicy>,
    next_id: ThreadId,
    max_threads_per_task: usize,
}

impl Scheduler {
    pub fn new(policy: Box<dyn SchedulingPolicy>) -> Self {
        Self::with_thread_limit(policy, MAX_THREADS_PER_TASK)
    }

    pub fn with_thread_limit(policy: Box<dyn SchedulingPolicy>, limit: usize) -> Self {
        Self {
            core: Core::new(),
            policy,
            next_id: 0,
            max_threads_per_task: limit,
        }
    }

    /// Create a thread in `task` and dispatch. Returns `None` if the task
    /// is absent, at its thread ceiling, or refuses the attachment; the
    /// dispatch still happens so the processor stays busy.
    pub fn create(&mut self, task: TaskId, host: &mut dyn Host) -> Option<ThreadId> {
        let Some(count) = host.task_thread_count(task) else {
            debug!("create: task {task} is absent");
            self.dispatch(host);
            return None;
        };
        if count >= self.max_threads_per_task {
            debug!("create: task {task} is at its thread ceiling ({count})");
            self.dispatch(host);
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let tcb = Tcb::new(task, host.task_priority(task));
        if !host.task_add_thread(task, id) {
            // Lost the attachment race; no TCB is retained.
            debug!("create: task {task} refused thread {id}");
            self.dispatch(host);
            return None;
        }
        self.core.threads.insert(id, tcb);
        self.core.ready.append(id);
        self.core.stats.threads_created += 1;
        self.dispatch(host);
        Some(id)
    }

    /// Kill `id`: detach it from its task, the ready queue, every device's
    /// pending-I/O set, and its resources, then dispatch. Draining the
    /// owning task's last thread terminates the task.
    pub fn kill(&mut self, id: ThreadId, host: &mut dyn Host) {
        let Some(tcb) = self.core.threads.get(&id) else {
            warn!("kill: unknown thread {id}");
            return;
        };
        if tcb.status == ThreadStatus::Killed {
            debug!("kill: thread {id} is already killed");
            return;
        }
        let task = tcb.task;

        match tcb.status {
            ThreadStatus::Ready => {
                self.core.ready.remove(id);
            }
            ThreadStatus::Running if self.core.context.current() == Some(id) => {
                self.core.context.clear();
                if host.task_current(task) == Some(id) {
                    host.task_set_current(task, None);
                }
                self.core.charge_burst(id, host.now());
            }
            _ => {}
        }

        host.task_remove_thread(task, id);
        self.core.set_status(id, ThreadStatus::Killed);

        for device in 0..host.device_count() {
            host.cancel_pending_io(device, id);
        }
        host.giveup_resources(id);
        self.core.stats.threads_killed += 1;

        self.dispatch(host);

        if host.task_thread_count(task) == Some(0) {
            host.task_kill(task);
        }
    }

    /// Suspend `id` on `event` and dispatch. Suspending an already-waiting
    /// thread stacks one more level of waiting. A thread pulled out of the
    /// ready queue is not registered on the event.
    pub fn suspend(&mut self, id: ThreadId, event: &mut dyn WaitEvent, host: &mut dyn Host) {
        let Some(status) = self.core.status(id) else {
            warn!("suspend: unknown thread {id}");
            return;
        };

        match status {
            ThreadStatus::Waiting { depth } => {
                self.core.set_status(id, ThreadStatus::Waiting { depth: depth + 1 });
            }
            ThreadStatus::Running if self.core.context.current() == Some(id) => {
                self.core.context.clear();
                let task = self.core.threads[&id].task;
                if host.task_current(task) == Some(id) {
                    host.task_set_current(task, None);
                }
                self.core.set_status(id, ThreadStatus::Waiting { depth: 1 });
                self.core.charge_burst(id, host.now());
            }
            _ => {}
        }

        if self.core.ready.remove(id) {
            // Came off the ready queue instead of parking on the event.
            self.core.set_status(id, ThreadStatus::Waiting { depth: 1 });
        } else {
            event.add_thread(id);
        }

        self.dispatch(host);
    }

    /// Wake `id` one level: `Waiting {1}` becomes ready and re-enters the
    /// ready queue, deeper waits lose one level. A non-waiting thread is a
    /// logged no-op.
    pub fn resume(&mut self, id: ThreadId, host: &mut dyn Host) {
        let Some(status) = self.core.status(id) else {
            warn!("resume: unknown thread {id}");
            return;
        };

        match status {
            ThreadStatus::Waiting { depth: 1 } => {
                self.core.set_status(id, ThreadStatus::Ready);
                self.core.ready.append(id);
            }
            ThreadStatus::Waiting { depth } => {
                self.core.set_status(id, ThreadStatus::Waiting { depth: depth - 1 });
            }
            other => {
                warn!("resume: thread {id} is {other:?}, not waiting");
                return;
            }
        }

        self.dispatch(host);
    }

    /// Run the policy once to (re)establish the running thread.
    pub fn dispatch(&mut self, host: &mut dyn Host) -> DispatchOutcome {
        self.core.stats.dispatches += 1;
        self.policy.dispatch(&mut self.core, host)
    }

    pub fn current(&self) -> Option<ThreadId> {
        self.core.current()
    }

    pub fn status(&self, id: ThreadId) -> Option<ThreadStatus> {
        self.core.status(id)
    }

    pub fn stats(&self) -> &SchedStats {
        &self.core.stats
    }

    /// Read-only view of the scheduling state, for hosts and tests.
    pub fn core(&self) -> &Core {
        &self.core
    }

    #[cfg(test)]
    pub(crate) fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// Seed a ready thread without running the dispatcher, so tests can lay
    /// out an exact ready-queue order.
    #[cfg(test)]
    pub(crate) fn insert_ready(&mut self, task: TaskId, priority: i32) -> ThreadId {
        let id = self.next_id;
        self.next_id += 1;
        self.core.threads.insert(id, Tcb::new(task, priority));
        self.core.ready.append(id);
        id
    }
}
