use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use ossim_net::{Transport, TransportEvent};
use ossim_pcb::{ConnId, Pcb, Queue, Status, safe_assert};
use ossim_protocol::{Frame, RequestKind};
use ossim_policy::{PolicyEvent, PolicyTick, SchedulingPolicy};
use tracing::{debug, info, trace, warn};

use crate::{error::Error, stats::Stats};

/// The tick-driven scheduling loop: admits clients, routes their
/// requests between `command`/`ready`/`blocked`, ages blocked PCBs, and
/// hands the ready queue and CPU slot to a [`SchedulingPolicy`] once per
/// tick.
pub struct Scheduler {
    transport: Transport,
    policy: Box<dyn SchedulingPolicy>,
    command_queue: Queue<Pcb>,
    ready_queue: Queue<Pcb>,
    blocked_queue: Queue<Pcb>,
    cpu_slot: Option<Pcb>,
    current_time_ms: u32,
    tick_ms: u32,
    next_pid: i32,
    stats: Stats,
}

impl Scheduler {
    /// Bind the listening socket and build a scheduler around `policy`.
    pub fn new(
        socket_path: &Path,
        policy: Box<dyn SchedulingPolicy>,
        tick_ms: u32,
        stats_enabled: bool,
    ) -> Result<Self, Error> {
        let transport = Transport::bind(socket_path)?;
        Ok(Self {
            transport,
            policy,
            command_queue: Queue::new(),
            ready_queue: Queue::new(),
            blocked_queue: Queue::new(),
            cpu_slot: None,
            current_time_ms: 0,
            tick_ms,
            next_pid: 1,
            stats: Stats::new(stats_enabled),
        })
    }

    /// Run ticks until `shutdown` is observed. Returns after finishing the
    /// in-flight tick — connected clients are not drained or notified,
    /// they simply see the socket go away.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!(policy = self.policy.name(), tick_ms = self.tick_ms, "scheduler started");

        while !shutdown.load(Ordering::Relaxed) {
            self.tick();
        }

        info!("shutdown signal observed, exiting");
        self.stats.report(self.policy.name());
    }

    /// One full tick: admission, routing, heartbeat, block aging, a
    /// second admission/routing pass, policy dispatch, and the clock
    /// advance. Mirrors the seven numbered steps of the core loop this
    /// implements, in order.
    fn tick(&mut self) {
        self.drain_transport();

        if self.current_time_ms % 1000 == 0 {
            info!(seconds = self.current_time_ms / 1000, "heartbeat");
        }

        self.age_blocked_queue();

        self.half_tick_sleep();
        self.drain_transport();

        let events = {
            let mut ctx = PolicyTick {
                now_ms: self.current_time_ms,
                ticks_ms: self.tick_ms,
                ready_q: &mut self.ready_queue,
                cpu_slot: &mut self.cpu_slot,
                command_q: &mut self.command_queue,
            };
            self.policy.tick(&mut ctx)
        };
        for PolicyEvent::Done { conn, pid } in events {
            self.transport.send(conn, Frame::done(pid, self.current_time_ms));
            self.stats.record_burst_completed();
        }

        self.check_invariants();
        self.half_tick_sleep();

        self.current_time_ms += self.tick_ms;
        self.stats.record_tick();
        trace!(now_ms = self.current_time_ms, "tick boundary");
    }

    fn half_tick_sleep(&self) {
        std::thread::sleep(Duration::from_millis(u64::from(self.tick_ms) / 2));
    }

    fn drain_transport(&mut self) {
        let mut events = Vec::new();
        self.transport.poll(|event| events.push(event));

        for event in events {
            match event {
                TransportEvent::Accepted { conn } => self.admit(conn),
                TransportEvent::Frame { conn, frame } => self.handle_frame(conn, frame),
                TransportEvent::BadFrame { conn, error } => {
                    warn!(?conn, %error, "unknown request opcode, ignoring frame");
                }
                TransportEvent::Disconnected { conn } => self.reclaim(conn),
            }
        }
    }

    fn admit(&mut self, conn: ConnId) {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.command_queue.enqueue(Pcb::new(pid, conn, 0));
        self.stats.record_client_served();
        debug!(pid, ?conn, "client admitted");
    }

    fn handle_frame(&mut self, conn: ConnId, frame: Frame) {
        match frame.request {
            RequestKind::Run => {
                let Some(mut pcb) = self.command_queue.remove_where(|p| p.conn() == conn) else {
                    warn!(?conn, "RUN from a connection with no pending PCB in command_queue");
                    return;
                };
                pcb.set_time_ms(frame.time_ms);
                pcb.set_elapsed_time_ms(0);
                pcb.set_status(Status::Running);
                let pid = pcb.pid();
                self.ready_queue.enqueue(pcb);
                self.transport.send(conn, Frame::ack(pid, self.current_time_ms));
            }
            RequestKind::Block => {
                let Some(mut pcb) = self.command_queue.remove_where(|p| p.conn() == conn) else {
                    warn!(?conn, "BLOCK from a connection with no pending PCB in command_queue");
                    return;
                };
                pcb.set_time_ms(frame.time_ms);
                pcb.set_status(Status::Blocked);
                pcb.set_last_update_time_ms(self.current_time_ms);
                let pid = pcb.pid();
                self.blocked_queue.enqueue(pcb);
                self.transport.send(conn, Frame::ack(pid, self.current_time_ms));
            }
            RequestKind::Ack | RequestKind::Done => {
                warn!(?conn, request = ?frame.request, "client sent a scheduler-only request, ignoring");
            }
        }
    }

    fn age_blocked_queue(&mut self) {
        let mut still_blocked = Queue::new();

        while let Some(mut pcb) = self.blocked_queue.dequeue() {
            if pcb.last_update_time_ms() < self.current_time_ms {
                let elapsed_out = pcb.age_block(self.tick_ms);
                pcb.set_last_update_time_ms(self.current_time_ms);

                if elapsed_out {
                    self.transport.send(pcb.conn(), Frame::done(pcb.pid(), self.current_time_ms));
                    pcb.reset_for_next_request();
                    self.command_queue.enqueue(pcb);
                    self.stats.record_burst_completed();
                    continue;
                }
            }
            still_blocked.enqueue(pcb);
        }

        self.blocked_queue = still_blocked;
    }

    fn reclaim(&mut self, conn: ConnId) {
        if self.command_queue.remove_where(|p| p.conn() == conn).is_some() {
            return;
        }
        if self.ready_queue.remove_where(|p| p.conn() == conn).is_some() {
            return;
        }
        if self.blocked_queue.remove_where(|p| p.conn() == conn).is_some() {
            return;
        }
        if self.cpu_slot.as_ref().is_some_and(|p| p.conn() == conn) {
            self.cpu_slot = None;
        }
    }

    /// Debug-only cross-check that no `pid` appears in more than one of
    /// `{command, ready, blocked, cpu_slot}` at once. A violation would
    /// mean the transport delivered a duplicate `Accepted` for a `ConnId`
    /// already tracked elsewhere.
    fn check_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        for pcb in self
            .command_queue
            .iter()
            .chain(self.ready_queue.iter())
            .chain(self.blocked_queue.iter())
            .chain(self.cpu_slot.iter())
        {
            safe_assert!(seen.insert(pcb.pid()), "duplicate pid {} across queues", pcb.pid());
        }
    }
}
