use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Raw key→value telemetry from one poll.
pub type RawSnapshot = HashMap<String, String>;

/// Boundary timeout for one poll of the driver.
const POLL_TIMEOUT_SECS: u64 = 10;

/// Trait for UPS telemetry sources.
///
/// Implementations never fail: any underlying error degrades to an empty
/// map, which the caller treats as "no data this tick".
pub trait SnapshotSource: Send + Sync {
    fn name(&self) -> &str;

    fn poll(&self) -> Pin<Box<dyn Future<Output = RawSnapshot> + Send + '_>>;
}

/// Polls a NUT daemon by spawning `upsc <ups-name>`.
pub struct UpscSource {
    ups_name: String,
}

impl UpscSource {
    pub fn new(ups_name: impl Into<String>) -> Self {
        Self {
            ups_name: ups_name.into(),
        }
    }

    /// Parse `key: value` lines as printed by upsc. Lines without a colon
    /// are skipped.
    fn parse_output(stdout: &str) -> RawSnapshot {
        let mut data = RawSnapshot::new();
        for line in stdout.lines() {
            if let Some((key, value)) = line.split_once(':') {
                data.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        data
    }
}

impl SnapshotSource for UpscSource {
    fn name(&self) -> &str {
        "upsc"
    }

    fn poll(&self) -> Pin<Box<dyn Future<Output = RawSnapshot> + Send + '_>> {
        Box::pin(async move {
            let result = tokio::time::timeout(
                Duration::from_secs(POLL_TIMEOUT_SECS),
                tokio::process::Command::new("upsc")
                    .arg(&self.ups_name)
                    .output(),
            )
            .await;

            match result {
                Ok(Ok(output)) if output.status.success() => {
                    Self::parse_output(&String::from_utf8_lossy(&output.stdout))
                }
                Ok(Ok(output)) => {
                    tracing::debug!(
                        ups = %self.ups_name,
                        code = ?output.status.code(),
                        "upsc exited non-zero"
                    );
                    RawSnapshot::new()
                }
                Ok(Err(e)) => {
                    tracing::debug!(ups = %self.ups_name, error = %e, "failed to spawn upsc");
                    RawSnapshot::new()
                }
                Err(_) => {
                    tracing::debug!(
                        ups = %self.ups_name,
                        "upsc timed out after {POLL_TIMEOUT_SECS}s"
                    );
                    RawSnapshot::new()
                }
            }
        })
    }
}
