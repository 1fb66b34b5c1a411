use crate::tick::{PolicyEvent, PolicyTick};
use crate::SchedulingPolicy;

/// Non-preemptive shortest-remaining-first dispatch. Aging and completion
/// behave exactly like [`crate::Fifo`] (including the re-park onto
/// `command_q` on completion); only slot-fill selection differs — the
/// ready queue is scanned for the PCB with the smallest `time_ms -
/// elapsed_time_ms`, ties broken in favor of the earlier arrival.
#[derive(Debug, Default)]
pub struct Sjf;

impl SchedulingPolicy for Sjf {
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
            if let Some(idx) = ctx.ready_q.min_by_key(ossim_pcb::Pcb::remaining_ms) {
                *ctx.cpu_slot = ctx.ready_q.remove_at(idx);
            }
        }

        events
    }

    fn name(&self) -> &'static str {
        "SJF"
    }
}
