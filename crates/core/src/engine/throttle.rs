use std::time::{Duration, Instant};

/// Alert categories with independent cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCategory {
    PeriodicOnBattery,
    LowBattery,
    ProlongedOutage,
}

const CATEGORY_COUNT: usize = 3;

impl AlertCategory {
    fn index(self) -> usize {
        match self {
            AlertCategory::PeriodicOnBattery => 0,
            AlertCategory::LowBattery => 1,
            AlertCategory::ProlongedOutage => 2,
        }
    }
}

/// Per-category cooldown gate: the single point preventing notification
/// storms when the input flaps.
///
/// Callers check `should_fire`, queue the alert, then `mark_fired`. The
/// throttle is updated on the attempt; delivery outcome never feeds back.
#[derive(Debug, Default)]
pub struct AlertThrottle {
    last_fired: [Option<Instant>; CATEGORY_COUNT],
}

impl AlertThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the category has never fired or its cooldown elapsed.
    pub fn should_fire(&self, category: AlertCategory, now: Instant, interval: Duration) -> bool {
        match self.last_fired[category.index()] {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= interval,
        }
    }

    /// Record an emission at `at`.
    pub fn mark_fired(&mut self, category: AlertCategory, at: Instant) {
        self.last_fired[category.index()] = Some(at);
    }

    /// Forget the category's last emission so the next check fires
    /// immediately.
    pub fn reset(&mut self, category: AlertCategory) {
        self.last_fired[category.index()] = None;
    }
}
