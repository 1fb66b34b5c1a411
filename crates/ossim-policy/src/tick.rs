use ossim_pcb::{ConnId, Pcb, Queue};

/// Everything a policy needs for one tick, borrowed from the scheduler
/// core's state rather than owned by the policy itself — this is what
/// keeps a [`crate::SchedulingPolicy`] a pure function over shared state
/// instead of a stateful owner of it.
pub struct PolicyTick<'a> {
    pub now_ms: u32,
    pub ticks_ms: u32,
    pub ready_q: &'a mut Queue<Pcb>,
    pub cpu_slot: &'a mut Option<Pcb>,
    pub command_q: &'a mut Queue<Pcb>,
}

/// Something a policy wants the caller to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyEvent {
    /// A burst finished; the caller should send `DONE(now_ms)` to `conn`.
    /// The owning PCB has already been re-parked onto `command_q` by the
    /// time this event is returned, ready for its next `RUN`/`BLOCK`.
    Done { conn: ConnId, pid: i32 },
}
