use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use super::status::StatusFlags;

const KEY_STATUS: &str = "ups.status";
const KEY_VOLTAGE: &str = "battery.voltage";
const KEY_CHARGE: &str = "battery.charge";
const KEY_RUNTIME: &str = "battery.runtime";

/// One telemetry value as reported by the driver: numeric when it parses,
/// otherwise kept as opaque display text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    Value(f64),
    Text(String),
    #[default]
    Missing,
}

impl Reading {
    fn from_raw(raw: Option<&String>) -> Self {
        match raw {
            None => Reading::Missing,
            Some(s) => match s.trim().parse::<f64>() {
                Ok(v) => Reading::Value(v),
                Err(_) => Reading::Text(s.trim().to_string()),
            },
        }
    }

    /// Numeric value, if this reading parsed as one. Non-numeric readings
    /// are display-only and excluded from aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }

    /// Prefer this reading, falling back to `other` when absent.
    pub fn or(self, other: &Reading) -> Reading {
        if self.is_missing() { other.clone() } else { self }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{v}"),
            Reading::Text(s) => write!(f, "{s}"),
            Reading::Missing => write!(f, "N/A"),
        }
    }
}

/// Immutable record of one poll of the UPS. Produced once per tick.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub flags: StatusFlags,
    pub voltage: Reading,
    pub charge: Reading,
    pub runtime: Reading,
    pub taken_at: Instant,
}

impl StatusSnapshot {
    /// Build from the raw key→value map returned by the driver. Missing
    /// keys degrade to all-false flags and unknown telemetry.
    pub fn from_raw(raw: &HashMap<String, String>, taken_at: Instant) -> Self {
        let flags = raw
            .get(KEY_STATUS)
            .map(|s| StatusFlags::parse(s))
            .unwrap_or_default();
        Self {
            flags,
            voltage: Reading::from_raw(raw.get(KEY_VOLTAGE)),
            charge: Reading::from_raw(raw.get(KEY_CHARGE)),
            runtime: Reading::from_raw(raw.get(KEY_RUNTIME)),
            taken_at,
        }
    }
}
