use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Manages graceful shutdown via CancellationToken.
/// Listens for SIGINT and SIGTERM and cancels the token.
#[derive(Debug)]
pub struct ShutdownGuard {
    token: CancellationToken,
}

impl Default for ShutdownGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownGuard {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// The cancellation token the monitor loop selects against.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn a background task that listens for OS signals and triggers
    /// cancellation.
    pub fn spawn_signal_listener(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            {
                let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate())
                {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to register SIGTERM handler");
                        // Fall back to ctrl-c alone.
                        if signal::ctrl_c().await.is_ok() {
                            tracing::info!("received SIGINT, initiating shutdown");
                            token.cancel();
                        }
                        return;
                    }
                };
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("received SIGTERM, initiating shutdown");
                    }
                    result = signal::ctrl_c() => {
                        if result.is_ok() {
                            tracing::info!("received SIGINT, initiating shutdown");
                        }
                    }
                }
                token.cancel();
            }

            #[cfg(not(unix))]
            {
                if signal::ctrl_c().await.is_ok() {
                    tracing::info!("received SIGINT, initiating shutdown");
                    token.cancel();
                }
            }
        });
    }
}
