use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::ups::Reading;

/// How a loss of line power resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// Confirmed outage that outlived the debounce threshold.
    Normal,
    /// Blip that self-resolved before the threshold.
    Micro,
}

/// One finished power-loss event. Immutable once appended.
#[derive(Debug, Clone)]
pub struct CutEvent {
    /// When the event ended.
    pub ended_at: Instant,
    pub duration: Duration,
    pub kind: CutKind,
    /// Battery charge at resolution, when the driver reported one.
    pub charge: Reading,
}

/// Aggregate over the events inside the trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub micro_count: usize,
    pub normal_count: usize,
    /// Sum of all in-window durations, both kinds.
    pub total_duration: Duration,
    /// Lowest numeric charge seen; `None` when no in-window event
    /// carried a numeric charge.
    pub min_charge: Option<f64>,
}

impl WindowStats {
    pub fn count(&self) -> usize {
        self.micro_count + self.normal_count
    }
}

/// Append-only log of past cuts, queried over a trailing window.
///
/// Ticks are strictly increasing, so insertion order is timestamp order.
/// Entries older than the window are inert; `prune` drops them as an
/// optimization, `recent` filters regardless.
#[derive(Debug, Default)]
pub struct CutHistory {
    events: VecDeque<CutEvent>,
}

impl CutHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: CutEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events no older than `window` as of `now`.
    pub fn recent(&self, now: Instant, window: Duration) -> impl Iterator<Item = &CutEvent> {
        self.events
            .iter()
            .filter(move |e| now.saturating_duration_since(e.ended_at) <= window)
    }

    pub fn aggregate(&self, now: Instant, window: Duration) -> WindowStats {
        let mut stats = WindowStats {
            micro_count: 0,
            normal_count: 0,
            total_duration: Duration::ZERO,
            min_charge: None,
        };
        for event in self.recent(now, window) {
            match event.kind {
                CutKind::Micro => stats.micro_count += 1,
                CutKind::Normal => stats.normal_count += 1,
            }
            stats.total_duration += event.duration;
            if let Some(charge) = event.charge.as_f64() {
                stats.min_charge = Some(match stats.min_charge {
                    Some(min) => min.min(charge),
                    None => charge,
                });
            }
        }
        stats
    }

    /// Drop events that fell out of the window.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(front) = self.events.front() {
            if now.saturating_duration_since(front.ended_at) > window {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}
