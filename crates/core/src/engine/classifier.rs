use std::time::{Duration, Instant};

use super::events::PowerEvent;
use crate::ups::{Reading, StatusSnapshot};

/// Power state of the UPS as tracked by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Online,
    /// Candidate outage buffered, not yet confirmed.
    PendingOutage,
    OnBattery,
}

/// Candidate outage held while debouncing.
#[derive(Debug, Clone)]
struct PendingBuffer {
    snapshot: StatusSnapshot,
    since: Instant,
}

/// State plus the data that only exists in that state, kept together so
/// the buffer-iff-pending invariant holds by construction.
#[derive(Debug)]
enum TrackerState {
    Online,
    Pending(PendingBuffer),
    OnBattery {
        /// When the outage began, back-dated to the first on-battery
        /// observation, not the confirmation tick.
        cut_start: Instant,
        /// Last battery voltage seen during the outage.
        voltage_before: Reading,
    },
}

/// The outage state machine: tracks ONLINE / ON_BATTERY, debounces
/// candidate outages against the microcut threshold, and emits confirmed
/// transition events. Owns all mutable outage context; nothing else
/// writes it.
#[derive(Debug)]
pub struct OutageTracker {
    state: TrackerState,
    /// Charging flag from the previous tick.
    charging: bool,
    /// Set when an outage ended with charging active; cleared once the
    /// recharge finishes (or another outage begins it anew).
    charging_after_cut: bool,
}

impl Default for OutageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OutageTracker {
    pub fn new() -> Self {
        Self {
            state: TrackerState::Online,
            charging: false,
            charging_after_cut: false,
        }
    }

    pub fn state(&self) -> PowerState {
        match self.state {
            TrackerState::Online => PowerState::Online,
            TrackerState::Pending(_) => PowerState::PendingOutage,
            TrackerState::OnBattery { .. } => PowerState::OnBattery,
        }
    }

    /// Onset of the currently-active confirmed outage.
    pub fn cut_start(&self) -> Option<Instant> {
        match self.state {
            TrackerState::OnBattery { cut_start, .. } => Some(cut_start),
            _ => None,
        }
    }

    /// Adopt the state observed at boot, so a monitor started mid-outage
    /// begins on battery instead of reporting a fresh outage.
    pub fn seed(&mut self, snapshot: &StatusSnapshot, now: Instant) {
        self.charging = snapshot.flags.charging;
        if snapshot.flags.on_battery {
            self.state = TrackerState::OnBattery {
                cut_start: now,
                voltage_before: snapshot.voltage.clone(),
            };
        }
    }

    /// Feed one snapshot; returns the confirmed transition events.
    pub fn observe(
        &mut self,
        snapshot: &StatusSnapshot,
        now: Instant,
        microcut_max: Duration,
    ) -> Vec<PowerEvent> {
        let flags = snapshot.flags;
        let mut events = Vec::new();

        self.state = match std::mem::replace(&mut self.state, TrackerState::Online) {
            TrackerState::Online => {
                if flags.on_battery {
                    TrackerState::Pending(PendingBuffer {
                        snapshot: snapshot.clone(),
                        since: now,
                    })
                } else {
                    TrackerState::Online
                }
            }

            TrackerState::Pending(buffer) => {
                if !flags.on_battery {
                    // Line came back before confirmation. Report a
                    // microcut only when it resolved under the threshold;
                    // the buffer is discarded either way.
                    let duration = now.saturating_duration_since(buffer.since);
                    if duration < microcut_max {
                        events.push(PowerEvent::Microcut {
                            duration,
                            charge: snapshot.charge.clone().or(&buffer.snapshot.charge),
                            voltage: snapshot.voltage.clone().or(&buffer.snapshot.voltage),
                            charging: flags.charging,
                        });
                    }
                    TrackerState::Online
                } else if now.saturating_duration_since(buffer.since) >= microcut_max {
                    // Confirmed. The report uses the telemetry captured at
                    // onset, and the outage is back-dated to it.
                    events.push(PowerEvent::OutageStarted {
                        voltage: buffer.snapshot.voltage.clone(),
                        runtime: buffer.snapshot.runtime.clone(),
                        charge: buffer.snapshot.charge.clone(),
                    });
                    TrackerState::OnBattery {
                        cut_start: buffer.since,
                        voltage_before: buffer.snapshot.voltage.clone(),
                    }
                } else {
                    TrackerState::Pending(buffer)
                }
            }

            TrackerState::OnBattery {
                cut_start,
                voltage_before,
            } => {
                if !flags.on_battery && (flags.online || flags.charging) {
                    events.push(PowerEvent::OutageEnded {
                        duration: now.saturating_duration_since(cut_start),
                        charge: snapshot.charge.clone(),
                        voltage_before,
                        voltage_after: snapshot.voltage.clone(),
                        charging: flags.charging,
                    });
                    self.charging_after_cut = flags.charging;
                    TrackerState::Online
                } else {
                    // Track the latest battery voltage for the recovery
                    // report; a tick without a reading keeps the last one.
                    let voltage_before = if snapshot.voltage.is_missing() {
                        voltage_before
                    } else {
                        snapshot.voltage.clone()
                    };
                    TrackerState::OnBattery {
                        cut_start,
                        voltage_before,
                    }
                }
            }
        };

        // Charge-complete: the post-outage recharge finished. Only
        // meaningful outside a confirmed outage.
        if !matches!(self.state, TrackerState::OnBattery { .. })
            && self.charging_after_cut
            && self.charging
            && !flags.charging
        {
            events.push(PowerEvent::ChargeComplete);
            self.charging_after_cut = false;
        }
        self.charging = flags.charging;

        events
    }
}
