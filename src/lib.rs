mod burst;
mod context;
mod host;
mod policy;
mod ready_queue;
mod scheduler;
pub mod sim;
mod stats;
mod thread;
mod timer;

pub use burst::{INITIAL_ESTIMATE, MIN_ESTIMATE};
pub use context::ProcessorContext;
pub use host::{AddressSpace, Host, TaskId, Tick, WaitEvent};
pub use policy::{DispatchOutcome, RoundRobin, SchedulingPolicy, ShortestBurst, QUANTUM};
pub use ready_queue::ReadyQueue;
pub use scheduler::{Core, Scheduler, MAX_THREADS_PER_TASK};
pub use stats::SchedStats;
pub use thread::{Tcb, ThreadId, ThreadStatus};
pub use timer::TimerInterrupt;
