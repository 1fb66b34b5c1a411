//! Process control blocks and the FIFO queue primitive they move through.
//!
//! This crate has no knowledge of sockets, wire formats, or scheduling
//! policy — it is the shared data model the rest of the workspace builds
//! on.

mod assert;
mod conn;
mod pcb;
mod queue;

pub use conn::ConnId;
pub use pcb::{Pcb, Status};
pub use queue::Queue;

/// Simulated clock tick granularity, in milliseconds.
pub const TICKS_MS: u32 = 10;
