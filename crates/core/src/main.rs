use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vigil_notify::{DiscordWebhook, NotifyChannel};

use vigil_core::config::VigilCfg;
use vigil_core::runtime::{Monitor, ShutdownGuard};
use vigil_core::ups::UpscSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Arc::new(VigilCfg::from_env());
    tracing::info!(
        ups = %cfg.ups_name,
        check_interval_secs = cfg.check_interval_secs,
        "starting vigil"
    );

    let channel: Option<Arc<dyn NotifyChannel>> =
        DiscordWebhook::from_env().map(|c| Arc::new(c) as _);
    if channel.is_none() {
        tracing::warn!("VIGIL_WEBHOOK_URL not set, alerts will only be logged");
    }

    let source = UpscSource::new(cfg.ups_name.clone());

    let guard = ShutdownGuard::new();
    guard.spawn_signal_listener();

    let monitor = Monitor::new(cfg, Box::new(source), channel, guard.token());
    monitor.run().await;

    tracing::info!("vigil stopped");
    Ok(())
}
