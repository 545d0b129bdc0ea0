use serde::{Deserialize, Serialize};
use std::time::Duration;

/// All monitor parameters. Defaults are the values the daemon has always
/// shipped with; every field can be overridden from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilCfg {
    /// UPS name passed to `upsc`.
    pub ups_name: String,

    /// Poll period in seconds. Fractional values allowed.
    pub check_interval_secs: f64,

    /// Spacing of periodic on-battery reports, and of prolonged-outage
    /// re-alerts, in seconds.
    pub report_interval_secs: u64,

    /// Elapsed on-battery time before the first prolonged-outage alert,
    /// in seconds.
    pub long_battery_alert_secs: u64,

    /// Trailing window for burst detection, in seconds.
    pub multiple_cuts_window_secs: u64,

    /// Cuts inside the window before a burst alert fires.
    pub cut_count_threshold: usize,

    /// Longest loss of line power still counted as a microcut, in seconds.
    /// Anything that persists past this is a real outage.
    pub microcut_max_secs: u64,
}

impl Default for VigilCfg {
    fn default() -> Self {
        Self {
            ups_name: "apc".into(),
            check_interval_secs: 0.5,
            report_interval_secs: 300,
            long_battery_alert_secs: 1800,
            multiple_cuts_window_secs: 900,
            cut_count_threshold: 2,
            microcut_max_secs: 5,
        }
    }
}

impl VigilCfg {
    /// Load from `VIGIL_*` environment variables, falling back to the
    /// default per key. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(name) = std::env::var("VIGIL_UPS_NAME") {
            cfg.ups_name = name;
        }
        env_parse("VIGIL_CHECK_INTERVAL_SECS", &mut cfg.check_interval_secs);
        env_parse("VIGIL_REPORT_INTERVAL_SECS", &mut cfg.report_interval_secs);
        env_parse(
            "VIGIL_LONG_BATTERY_ALERT_SECS",
            &mut cfg.long_battery_alert_secs,
        );
        env_parse(
            "VIGIL_MULTIPLE_CUTS_WINDOW_SECS",
            &mut cfg.multiple_cuts_window_secs,
        );
        env_parse("VIGIL_CUT_COUNT_THRESHOLD", &mut cfg.cut_count_threshold);
        env_parse("VIGIL_MICROCUT_MAX_SECS", &mut cfg.microcut_max_secs);
        cfg
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs_f64(self.check_interval_secs.max(0.1))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn long_battery_alert(&self) -> Duration {
        Duration::from_secs(self.long_battery_alert_secs)
    }

    pub fn cuts_window(&self) -> Duration {
        Duration::from_secs(self.multiple_cuts_window_secs)
    }

    pub fn microcut_max(&self) -> Duration {
        Duration::from_secs(self.microcut_max_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!(key, raw = %raw, "ignoring unparseable config override"),
        }
    }
}
