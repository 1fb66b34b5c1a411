use crate::conn::ConnId;

/// Lifecycle status of a simulated process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Connected, expected to send the next `RUN`/`BLOCK` request.
    Command,
    /// Aging out an I/O wait in `blocked_queue`.
    Blocked,
    /// In `ready_queue` or currently holding the CPU slot.
    Running,
    /// Finished its burst, about to be reaped.
    Stopped,
    /// Disconnected; pending removal.
    Terminated,
}

/// Process Control Block.
///
/// Owned by whichever queue (or the CPU slot) currently holds it —
/// `Pcb` is not `Clone`, so the "resides in at most one place" invariant
/// from the data model is enforced by the type system rather than by
/// discipline.
#[derive(Debug)]
pub struct Pcb {
    pid: i32,
    status: Status,
    conn: ConnId,
    time_ms: u32,
    elapsed_time_ms: u32,
    slice_start_ms: u32,
    last_update_time_ms: u32,
}

impl Pcb {
    #[must_use]
    pub fn new(pid: i32, conn: ConnId, time_ms: u32) -> Self {
        Self {
            pid,
            status: Status::Command,
            conn,
            time_ms,
            elapsed_time_ms: 0,
            slice_start_ms: 0,
            last_update_time_ms: 0,
        }
    }

    #[must_use]
    pub const fn pid(&self) -> i32 {
        self.pid
    }

    #[must_use]
    pub const fn conn(&self) -> ConnId {
        self.conn
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    #[must_use]
    pub const fn time_ms(&self) -> u32 {
        self.time_ms
    }

    pub fn set_time_ms(&mut self, time_ms: u32) {
        self.time_ms = time_ms;
    }

    #[must_use]
    pub const fn elapsed_time_ms(&self) -> u32 {
        self.elapsed_time_ms
    }

    pub fn set_elapsed_time_ms(&mut self, elapsed: u32) {
        self.elapsed_time_ms = elapsed;
    }

    /// `time_ms - elapsed_time_ms`, floored at 0. Used by SJF to rank PCBs
    /// by remaining burst.
    #[must_use]
    pub const fn remaining_ms(&self) -> u32 {
        self.time_ms.saturating_sub(self.elapsed_time_ms)
    }

    #[must_use]
    pub const fn slice_start_ms(&self) -> u32 {
        self.slice_start_ms
    }

    pub fn set_slice_start_ms(&mut self, slice_start_ms: u32) {
        self.slice_start_ms = slice_start_ms;
    }

    #[must_use]
    pub const fn last_update_time_ms(&self) -> u32 {
        self.last_update_time_ms
    }

    pub fn set_last_update_time_ms(&mut self, now_ms: u32) {
        self.last_update_time_ms = now_ms;
    }

    /// Advance the running burst by one tick. Returns whether the burst is
    /// now complete (`elapsed_time_ms >= time_ms`).
    pub fn advance(&mut self, ticks_ms: u32) -> bool {
        self.elapsed_time_ms = self.elapsed_time_ms.saturating_add(ticks_ms);
        self.elapsed_time_ms >= self.time_ms
    }

    /// Decrement a blocked PCB's remaining wait by one tick, saturating at
    /// zero. Returns whether the block has fully elapsed.
    pub fn age_block(&mut self, ticks_ms: u32) -> bool {
        self.time_ms = self.time_ms.saturating_sub(ticks_ms);
        self.time_ms == 0
    }

    /// Reset the PCB to start a fresh burst/block request, as it
    /// transitions back to `Command` awaiting the next `RUN`/`BLOCK`.
    pub fn reset_for_next_request(&mut self) {
        self.status = Status::Command;
        self.time_ms = 0;
        self.elapsed_time_ms = 0;
    }
}
