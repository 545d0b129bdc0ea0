//! Renders power events into notification messages.
//!
//! One embed per event, colors and field sets matching the operator's
//! dashboard conventions. Telemetry that never parsed stays as the
//! driver's own text (`N/A` when absent entirely).

use std::time::Duration;

use chrono::Local;
use vigil_notify::Message;

use crate::engine::PowerEvent;

const COLOR_STARTUP: u32 = 0x95a5a6;
const COLOR_OUTAGE_STARTED: u32 = 0xf1c40f;
const COLOR_OUTAGE_ENDED: u32 = 0x2ecc71;
const COLOR_MICROCUT: u32 = 0xf39c12;
const COLOR_BURST: u32 = 0xe67e22;
const COLOR_PERIODIC: u32 = 0x3498db;
const COLOR_LOW_BATTERY: u32 = 0xe74c3c;
const COLOR_PROLONGED: u32 = 0xe67e22;
const COLOR_CHARGED: u32 = 0x27ae60;

/// Banner sent once when the monitor comes up.
pub fn startup(ups_name: &str) -> Message {
    Message::new("UPS monitor started", COLOR_STARTUP)
        .field("UPS", ups_name)
        .field("Time", Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Render one power event as a deliverable message.
pub fn render(event: &PowerEvent) -> Message {
    match event {
        PowerEvent::OutageStarted {
            voltage,
            runtime,
            charge,
        } => Message::new("UPS switched to battery power", COLOR_OUTAGE_STARTED)
            .field("Battery voltage", format!("{voltage} V"))
            .field("Estimated runtime", format!("{runtime} s"))
            .field("Charge", format!("{charge} %")),

        PowerEvent::OutageEnded {
            duration,
            charge,
            voltage_before,
            voltage_after,
            charging,
        } => Message::new("UPS back on line power", COLOR_OUTAGE_ENDED)
            .field("Time on battery", minutes_seconds(*duration))
            .field("Charge", format!("{charge} %"))
            .field("Voltage before", format!("{voltage_before} V"))
            .field("Voltage on line", format!("{voltage_after} V"))
            .field("State", if *charging { "Charging" } else { "Standby" }),

        PowerEvent::Microcut {
            duration,
            charge,
            voltage,
            charging,
        } => Message::new("Microcut detected", COLOR_MICROCUT)
            .field("Duration", format!("{:.1} seconds", duration.as_secs_f64()))
            .field("State", if *charging { "Charging" } else { "Online" })
            .field("Battery charge", format!("{charge} %"))
            .field("Voltage", format!("{voltage} V")),

        PowerEvent::Burst(stats) => {
            let min_charge = stats
                .min_charge
                .map(|c| format!("{c} %"))
                .unwrap_or_else(|| "N/A".into());
            Message::new("Multiple power events detected", COLOR_BURST)
                .field("Microcuts", stats.micro_count.to_string())
                .field("Normal cuts", stats.normal_count.to_string())
                .field(
                    "Total time off line",
                    format!("{:.1} s", stats.total_duration.as_secs_f64()),
                )
                .field("Lowest charge seen", min_charge)
                .mention()
        }

        PowerEvent::PeriodicStatus {
            voltage,
            runtime,
            charge,
        } => Message::new("On-battery status update", COLOR_PERIODIC)
            .field("Voltage", format!("{voltage} V"))
            .field("Runtime", format!("{runtime} s"))
            .field("Charge", format!("{charge} %")),

        PowerEvent::LowBattery => Message::new("Low battery", COLOR_LOW_BATTERY)
            .field("State", "Battery below the low threshold")
            .mention(),

        PowerEvent::ProlongedOutage { elapsed } => {
            Message::new("Extended time on battery", COLOR_PROLONGED).field(
                "Duration",
                format!("{} minutes on battery", elapsed.as_secs() / 60),
            )
        }

        PowerEvent::ChargeComplete => {
            Message::new("Battery fully charged", COLOR_CHARGED).field("State", "Recharge finished")
        }
    }
}

fn minutes_seconds(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{} min {} s", total / 60, total % 60)
}
