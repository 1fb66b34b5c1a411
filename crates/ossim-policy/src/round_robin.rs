use crate::tick::{PolicyEvent, PolicyTick};
use crate::SchedulingPolicy;

/// Default quantum, in milliseconds, a PCB may hold the CPU before being
/// re-enqueued behind its peers. Overridable per instance via
/// [`RoundRobin::new`].
pub const TIME_SLICE_MS: u32 = 500;

/// Preemptive round robin with a fixed quantum. A PCB that doesn't finish
/// its burst within the quantum is sent to the tail of the ready queue
/// and a fresh PCB is dispatched. A PCB that does finish is re-parked
/// onto `command_q` for its next request rather than freed.
#[derive(Debug)]
pub struct RoundRobin {
    time_slice_ms: u32,
    current_slice_remaining: u32,
}

impl RoundRobin {
    #[must_use]
    pub const fn new(time_slice_ms: u32) -> Self {
        Self { time_slice_ms, current_slice_remaining: 0 }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new(TIME_SLICE_MS)
    }
}

impl SchedulingPolicy for RoundRobin {
    fn tick(&mut self, ctx: &mut PolicyTick<'_>) -> Vec<PolicyEvent> {
        let mut events = Vec::new();

        if let Some(pcb) = ctx.cpu_slot.as_mut() {
            let finished = pcb.advance(ctx.ticks_ms);
            self.current_slice_remaining = self.current_slice_remaining.saturating_sub(ctx.ticks_ms);

            if finished {
                let mut pcb = ctx.cpu_slot.take().expect("cpu_slot just matched Some");
                events.push(PolicyEvent::Done { conn: pcb.conn(), pid: pcb.pid() });
                pcb.reset_for_next_request();
                ctx.command_q.enqueue(pcb);
                self.current_slice_remaining = 0;
            } else if self.current_slice_remaining == 0 {
                let pcb = ctx.cpu_slot.take().expect("cpu_slot just matched Some");
                ctx.ready_q.enqueue(pcb);
            }
        }

        if ctx.cpu_slot.is_none() {
            if let Some(pcb) = ctx.ready_q.dequeue() {
                *ctx.cpu_slot = Some(pcb);
                self.current_slice_remaining = self.time_slice_ms;
            }
        }

        events
    }

    fn name(&self) -> &'static str {
        "RR"
    }
}
