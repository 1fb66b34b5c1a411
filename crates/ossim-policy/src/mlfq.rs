use ossim_pcb::Queue;

use crate::tick::{PolicyEvent, PolicyTick};
use crate::SchedulingPolicy;

/// Per-level quanta, in milliseconds, for `Q0`, `Q1`, `Q2`.
pub const QUANTUM_MS: [u32; 3] = [500, 1000, 2000];

/// Three-level, demotion-only multi-level feedback queue.
///
/// New arrivals always enter `Q0`. A PCB that exhausts its current
/// level's quantum without finishing is demoted one level (never past
/// `Q2`); there is no priority boosting, so a PCB that lands in `Q2`
/// stays there for the rest of its burst. A finished burst re-parks the
/// PCB onto `command_q` for its next request, the same as every other
/// policy in this crate.
#[derive(Debug)]
pub struct Mlfq {
    queues: [Queue<ossim_pcb::Pcb>; 3],
    running_level: usize,
    current_slice_time: u32,
}

impl Default for Mlfq {
    fn default() -> Self {
        Self { queues: [Queue::new(), Queue::new(), Queue::new()], running_level: 0, current_slice_time: 0 }
    }
}

impl SchedulingPolicy for Mlfq {
    fn tick(&mut self, ctx: &mut PolicyTick<'_>) -> Vec<PolicyEvent> {
        let mut events = Vec::new();

        while let Some(pcb) = ctx.ready_q.dequeue() {
            self.queues[0].enqueue(pcb);
        }

        if let Some(pcb) = ctx.cpu_slot.as_mut() {
            let finished = pcb.advance(ctx.ticks_ms);
            self.current_slice_time += ctx.ticks_ms;

            if finished {
                let mut pcb = ctx.cpu_slot.take().expect("cpu_slot just matched Some");
                events.push(PolicyEvent::Done { conn: pcb.conn(), pid: pcb.pid() });
                pcb.reset_for_next_request();
                ctx.command_q.enqueue(pcb);
                self.current_slice_time = 0;
            } else if self.current_slice_time >= QUANTUM_MS[self.running_level] {
                let pcb = ctx.cpu_slot.take().expect("cpu_slot just matched Some");
                let demoted_level = (self.running_level + 1).min(2);
                self.queues[demoted_level].enqueue(pcb);
                self.current_slice_time = 0;
            }
        }

        if ctx.cpu_slot.is_none() {
            for level in 0..self.queues.len() {
                if let Some(pcb) = self.queues[level].dequeue() {
                    self.running_level = level;
                    self.current_slice_time = 0;
                    *ctx.cpu_slot = Some(pcb);
                    break;
                }
            }
        }

        events
    }

    fn name(&self) -> &'static str {
        "MLFQ"
    }
}
