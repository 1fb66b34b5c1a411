use clap::ValueEnum;

use crate::{Fifo, Mlfq, RoundRobin, Sjf};
use crate::SchedulingPolicy;

/// The set of known scheduling disciplines, selectable from the command
/// line. `clap`'s derive validates the argument against this set and
/// prints the list of known names on a mismatch, so an unrecognized
/// policy name never reaches [`PolicyKind::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum PolicyKind {
    Fifo,
    Sjf,
    Rr,
    Mlfq,
}

impl PolicyKind {
    /// Construct a fresh policy instance with default (zeroed) internal
    /// state — a new `cpu_slot`/ready-queue pairing always starts a
    /// policy at this baseline. `quantum_ms` only affects `Rr`.
    #[must_use]
    pub fn build(self, quantum_ms: u32) -> Box<dyn SchedulingPolicy> {
        match self {
            Self::Fifo => Box::new(Fifo),
            Self::Sjf => Box::new(Sjf),
            Self::Rr => Box::new(RoundRobin::new(quantum_ms)),
            Self::Mlfq => Box::new(Mlfq::default()),
        }
    }
}
