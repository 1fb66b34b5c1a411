use std::path::PathBuf;

use clap::Parser;
use ossim_policy::{PolicyKind, TIME_SLICE_MS};

/// Default location of the listening socket when `--socket` is omitted.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/scheduler.sock";

/// Single-CPU process-scheduling simulator.
#[derive(Debug, Parser)]
#[command(name = "ossim", version, about)]
pub struct Cli {
    /// Scheduling discipline to run.
    #[arg(value_enum)]
    pub policy: PolicyKind,

    /// Path of the Unix domain socket to listen on.
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Simulated clock tick granularity, in milliseconds.
    #[arg(long, default_value_t = ossim_pcb::TICKS_MS)]
    pub tick_ms: u32,

    /// Round Robin time slice, in milliseconds. Ignored by other policies.
    #[arg(long, default_value_t = TIME_SLICE_MS)]
    pub quantum_ms: u32,

    /// Print an end-of-run summary (ticks run, clients served, dispatch
    /// count) on shutdown.
    #[arg(long)]
    pub stats: bool,

    /// Raise the log level; repeatable (`-v` = debug, `-vv` = trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
