use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use vigil_notify::{Message, NotifyChannel};

use crate::config::VigilCfg;
use crate::engine::Engine;
use crate::report;
use crate::ups::{SnapshotSource, StatusSnapshot};

/// Drives the poll → classify → notify cycle.
///
/// Single-task and tick-driven: one cycle runs to completion before the
/// next begins. Delivery is fire-and-forget: a failed send is logged and
/// never fed back into classification.
pub struct Monitor {
    cfg: Arc<VigilCfg>,
    source: Box<dyn SnapshotSource>,
    channel: Option<Arc<dyn NotifyChannel>>,
    engine: Engine,
    token: CancellationToken,
}

impl Monitor {
    pub fn new(
        cfg: Arc<VigilCfg>,
        source: Box<dyn SnapshotSource>,
        channel: Option<Arc<dyn NotifyChannel>>,
        token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            source,
            channel,
            engine: Engine::new(),
            token,
        }
    }

    /// Run until the cancellation token fires.
    pub async fn run(mut self) {
        self.deliver(report::startup(&self.cfg.ups_name)).await;
        self.seed_initial_state().await;

        let mut interval = tokio::time::interval(self.cfg.check_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    tracing::info!("shutdown requested, stopping monitor");
                    break;
                }
                _ = interval.tick() => {
                    self.tick_once().await;
                }
            }
        }
    }

    /// Adopt whatever state the UPS is already in, so a monitor booted
    /// mid-outage does not report a fresh outage.
    async fn seed_initial_state(&mut self) {
        let raw = self.source.poll().await;
        if raw.is_empty() {
            tracing::warn!(source = self.source.name(), "no initial snapshot");
            return;
        }
        let now = Instant::now();
        let snapshot = StatusSnapshot::from_raw(&raw, now);
        self.engine.seed(&snapshot, now);
        let flags: Vec<_> = snapshot.flags.active().iter().map(|f| f.label()).collect();
        tracing::info!(state = ?self.engine.state(), ?flags, "initial UPS state");
    }

    async fn tick_once(&mut self) {
        let raw = self.source.poll().await;
        let now = Instant::now();
        if raw.is_empty() {
            // No data: hold state rather than fabricate an all-flags-false
            // reading that could look like a recovery mid-outage.
            tracing::warn!(source = self.source.name(), "empty snapshot, holding state");
            return;
        }

        let snapshot = StatusSnapshot::from_raw(&raw, now);
        let events = self.engine.tick(&snapshot, now, &self.cfg);
        for event in events {
            tracing::info!(event = event.name(), state = ?self.engine.state(), "power event");
            self.deliver(report::render(&event)).await;
        }
    }

    async fn deliver(&self, message: Message) {
        let Some(channel) = &self.channel else {
            tracing::info!(title = %message.title, "no channel configured, alert logged only");
            return;
        };
        if let Err(e) = channel.send(message).await {
            tracing::warn!(channel = channel.name(), error = %e, "notification delivery failed");
        }
    }
}
