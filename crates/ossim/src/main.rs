use std::sync::{Arc, atomic::AtomicBool};

use clap::Parser;
use ossim::{Cli, Scheduler};
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string())),
        )
        .init();

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(&shutdown)) {
            tracing::warn!(%err, signal, "couldn't install signal handler");
        }
    }

    let policy = cli.policy.build(cli.quantum_ms);
    let result = Scheduler::new(&cli.socket, policy, cli.tick_ms, cli.stats)
        .map(|mut scheduler| scheduler.run(&shutdown));

    if let Err(err) = result {
        tracing::error!(%err, "fatal error");
        std::process::exit(1);
    }
}
