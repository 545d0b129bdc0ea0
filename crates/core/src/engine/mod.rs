//! Event classification, debounce, and alert throttling.
//!
//! [`Engine`] packs the outage state machine, the cut history window, and
//! the per-category alert throttle into the one context object the tick
//! function mutates. It is deliberately synchronous and time-injected:
//! every operation takes `now`, so tests drive it with synthetic clocks.

mod classifier;
mod events;
mod history;
mod throttle;

pub use classifier::{OutageTracker, PowerState};
pub use events::PowerEvent;
pub use history::{CutEvent, CutHistory, CutKind, WindowStats};
pub use throttle::{AlertCategory, AlertThrottle};

use std::time::{Duration, Instant};

use crate::config::VigilCfg;
use crate::ups::StatusSnapshot;

/// Low-battery alerts repeat at most once per minute while the flag holds.
const LOW_BATTERY_COOLDOWN: Duration = Duration::from_secs(60);

/// The classification engine: one instance per monitored UPS, exclusively
/// owned by the runtime.
#[derive(Debug, Default)]
pub struct Engine {
    tracker: OutageTracker,
    history: CutHistory,
    throttle: AlertThrottle,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PowerState {
        self.tracker.state()
    }

    /// Adopt the state observed at boot. A monitor started mid-outage
    /// begins on battery with its report cooldowns primed, so the first
    /// periodic and low-battery alerts wait a full interval.
    pub fn seed(&mut self, snapshot: &StatusSnapshot, now: Instant) {
        self.tracker.seed(snapshot, now);
        if self.tracker.state() == PowerState::OnBattery {
            self.throttle.mark_fired(AlertCategory::PeriodicOnBattery, now);
            self.throttle.mark_fired(AlertCategory::LowBattery, now);
        }
    }

    /// One poll-classify cycle: feed the snapshot through the state
    /// machine, maintain the cut history, and gate the throttled
    /// sub-alerts. Returns every event to report this tick, in order.
    pub fn tick(
        &mut self,
        snapshot: &StatusSnapshot,
        now: Instant,
        cfg: &VigilCfg,
    ) -> Vec<PowerEvent> {
        let transitions = self.tracker.observe(snapshot, now, cfg.microcut_max());

        let mut events = Vec::with_capacity(transitions.len());
        for event in transitions {
            match &event {
                PowerEvent::OutageStarted { .. } => {
                    // First periodic report counts from the outage onset.
                    if let Some(start) = self.tracker.cut_start() {
                        self.throttle.mark_fired(AlertCategory::PeriodicOnBattery, start);
                    }
                    events.push(event);
                }
                PowerEvent::OutageEnded {
                    duration, charge, ..
                } => {
                    self.history.append(CutEvent {
                        ended_at: now,
                        duration: *duration,
                        kind: CutKind::Normal,
                        charge: charge.clone(),
                    });
                    // The next outage's prolonged alert starts fresh.
                    self.throttle.reset(AlertCategory::ProlongedOutage);
                    events.push(event);
                }
                PowerEvent::Microcut {
                    duration, charge, ..
                } => {
                    self.history.append(CutEvent {
                        ended_at: now,
                        duration: *duration,
                        kind: CutKind::Micro,
                        charge: charge.clone(),
                    });
                    events.push(event);
                    // Burst detection runs only on microcut appends;
                    // confirmed outages were already alerted in full.
                    let stats = self.history.aggregate(now, cfg.cuts_window());
                    if stats.count() >= cfg.cut_count_threshold {
                        events.push(PowerEvent::Burst(stats));
                    }
                }
                _ => events.push(event),
            }
        }

        self.sub_alerts(snapshot, now, cfg, &mut events);
        self.history.prune(now, cfg.cuts_window());
        events
    }

    /// Periodic / threshold alerts, evaluated only while on battery.
    fn sub_alerts(
        &mut self,
        snapshot: &StatusSnapshot,
        now: Instant,
        cfg: &VigilCfg,
        events: &mut Vec<PowerEvent>,
    ) {
        // The low-battery cooldown returns to never the moment the flag
        // clears, wherever that happens, so the first alert after any
        // recovery is immediate.
        if !snapshot.flags.low_battery {
            self.throttle.reset(AlertCategory::LowBattery);
        }

        if self.tracker.state() != PowerState::OnBattery {
            return;
        }

        if self
            .throttle
            .should_fire(AlertCategory::PeriodicOnBattery, now, cfg.report_interval())
        {
            events.push(PowerEvent::PeriodicStatus {
                voltage: snapshot.voltage.clone(),
                runtime: snapshot.runtime.clone(),
                charge: snapshot.charge.clone(),
            });
            self.throttle.mark_fired(AlertCategory::PeriodicOnBattery, now);
        }

        if snapshot.flags.low_battery
            && self
                .throttle
                .should_fire(AlertCategory::LowBattery, now, LOW_BATTERY_COOLDOWN)
        {
            events.push(PowerEvent::LowBattery);
            self.throttle.mark_fired(AlertCategory::LowBattery, now);
        }

        if let Some(start) = self.tracker.cut_start() {
            let elapsed = now.saturating_duration_since(start);
            if elapsed >= cfg.long_battery_alert()
                && self
                    .throttle
                    .should_fire(AlertCategory::ProlongedOutage, now, cfg.report_interval())
            {
                events.push(PowerEvent::ProlongedOutage { elapsed });
                self.throttle.mark_fired(AlertCategory::ProlongedOutage, now);
            }
        }
    }
}
