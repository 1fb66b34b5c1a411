//! Scheduling policies as pure-ish state machines over the shared PCB
//! and queue model: FIFO, SJF, Round Robin, and MLFQ.

mod fifo;
mod mlfq;
mod round_robin;
mod selector;
mod sjf;
mod tick;

pub use fifo::Fifo;
pub use mlfq::{Mlfq, QUANTUM_MS};
pub use round_robin::{RoundRobin, TIME_SLICE_MS};
pub use selector::PolicyKind;
pub use sjf::Sjf;
pub use tick::{PolicyEvent, PolicyTick};

/// One tick of dispatch logic for a single scheduling discipline.
///
/// Implementors don't perform I/O themselves — a tick only mutates the
/// queues and CPU slot it's handed and returns [`PolicyEvent`]s for the
/// caller (the scheduler core) to act on, which keeps every policy
/// testable in isolation from the transport layer.
pub trait SchedulingPolicy: std::fmt::Debug {
    fn tick(&mut self, ctx: &mut PolicyTick<'_>) -> Vec<PolicyEvent>;

    /// Short, stable name for logging and end-of-run stats.
    fn name(&self) -> &'static str;
}
