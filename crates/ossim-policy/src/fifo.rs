use crate::tick::{PolicyEvent, PolicyTick};
use crate::SchedulingPolicy;

/// Non-preemptive, arrival-order dispatch. A PCB keeps the CPU until its
/// burst completes, then is re-parked onto `command_q` for its next
/// `RUN`/`BLOCK` request rather than freed — the same re-park every
/// policy here now shares, so a multi-burst client never stalls after
/// its first burst regardless of which discipline is running it.
#[derive(Debug, Default)]
pub struct Fifo;

impl SchedulingPolicy for Fifo {
    fn tick(&mut self, ctx: &mut PolicyTick<'_>) -> Vec<PolicyEvent> {
        let mut events = Vec::new();

        if let Some(pcb) = ctx.cpu_slot.as_mut() {
            if pcb.advance(ctx.ticks_ms) {
                let mut pcb = ctx.cpu_slot.take().expect("cpu_slot just matched Some");
                events.push(PolicyEvent::Done { conn: pcb.conn(), pid: pcb.pid() });
                pcb.reset_for_next_request();
                ctx.command_q.enqueue(pcb);
            }
        }

        if ctx.cpu_slot.is_none() {
            if let Some(pcb) = ctx.ready_q.dequeue() {
                *ctx.cpu_slot = Some(pcb);
            }
        }

        events
    }

    fn name(&self) -> &'static str {
        "FIFO"
    }
}
