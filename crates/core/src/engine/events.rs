use std::time::Duration;

use super::history::WindowStats;
use crate::ups::Reading;

/// A meaningful, de-duplicated power event produced by one tick.
///
/// Each variant carries exactly the telemetry its notification renders.
#[derive(Debug, Clone)]
pub enum PowerEvent {
    /// Line power lost and the loss outlived the debounce threshold.
    /// Telemetry comes from the snapshot buffered at first observation.
    OutageStarted {
        voltage: Reading,
        runtime: Reading,
        charge: Reading,
    },
    /// Line power restored after a confirmed outage. Duration is measured
    /// from the back-dated onset, not from confirmation.
    OutageEnded {
        duration: Duration,
        charge: Reading,
        voltage_before: Reading,
        voltage_after: Reading,
        charging: bool,
    },
    /// Sub-threshold loss of line power that self-resolved.
    Microcut {
        duration: Duration,
        charge: Reading,
        voltage: Reading,
        charging: bool,
    },
    /// Several cuts clustered inside the trailing window.
    Burst(WindowStats),
    /// Periodic status report while on battery.
    PeriodicStatus {
        voltage: Reading,
        runtime: Reading,
        charge: Reading,
    },
    /// Battery below the driver's low threshold.
    LowBattery,
    /// Still on battery past the prolonged-outage threshold.
    ProlongedOutage { elapsed: Duration },
    /// Battery finished recharging after an outage.
    ChargeComplete,
}

impl PowerEvent {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PowerEvent::OutageStarted { .. } => "outage_started",
            PowerEvent::OutageEnded { .. } => "outage_ended",
            PowerEvent::Microcut { .. } => "microcut",
            PowerEvent::Burst(_) => "burst",
            PowerEvent::PeriodicStatus { .. } => "periodic_status",
            PowerEvent::LowBattery => "low_battery",
            PowerEvent::ProlongedOutage { .. } => "prolonged_outage",
            PowerEvent::ChargeComplete => "charge_complete",
        }
    }
}
