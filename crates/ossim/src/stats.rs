use tracing::info;

/// End-of-run summary, printed via `tracing::info!` on shutdown when
/// `--stats` is passed.
#[derive(Debug, Default)]
pub struct Stats {
    enabled: bool,
    ticks: u64,
    clients_served: u64,
    bursts_completed: u64,
}

impl Stats {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled, ticks: 0, clients_served: 0, bursts_completed: 0 }
    }

    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn record_client_served(&mut self) {
        self.clients_served += 1;
    }

    pub fn record_burst_completed(&mut self) {
        self.bursts_completed += 1;
    }

    pub fn report(&self, policy_name: &str) {
        if !self.enabled {
            return;
        }
        info!(
            policy = policy_name,
            ticks = self.ticks,
            clients_served = self.clients_served,
            bursts_completed = self.bursts_completed,
            "end of run"
        );
    }
}
