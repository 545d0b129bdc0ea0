//! End-to-end classification scenarios: status strings in, power events
//! out, driven with a synthetic clock through the full engine.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use vigil_core::config::VigilCfg;
use vigil_core::engine::{Engine, PowerEvent, PowerState};
use vigil_core::ups::StatusSnapshot;

fn snap(status: &str, telemetry: &[(&str, &str)], at: Instant) -> StatusSnapshot {
    let mut raw: HashMap<String, String> = telemetry
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    if !status.is_empty() {
        raw.insert("ups.status".into(), status.into());
    }
    StatusSnapshot::from_raw(&raw, at)
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Drive the engine with (status, offset-seconds) pairs; collect all
/// emitted events tagged with their offset.
fn drive(
    engine: &mut Engine,
    cfg: &VigilCfg,
    t0: Instant,
    script: &[(&str, u64)],
) -> Vec<(u64, PowerEvent)> {
    let mut all = Vec::new();
    for (status, offset) in script {
        let at = t0 + secs(*offset);
        for event in engine.tick(&snap(status, &[], at), at, cfg) {
            all.push((*offset, event));
        }
    }
    all
}

/// An on-battery blip from t=0 to t=3 with a 5 s threshold yields
/// exactly one microcut of about 3 s and no outage pair.
#[test]
fn three_second_blip_is_one_microcut() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[("OL", 0), ("OB", 1), ("OB", 2), ("OL", 4)],
    );

    let emitted: Vec<_> = events.iter().map(|(_, e)| e.name()).collect();
    assert_eq!(emitted, vec!["microcut"]);
    match &events[0].1 {
        PowerEvent::Microcut { duration, .. } => assert_eq!(*duration, secs(3)),
        other => panic!("expected microcut, got {other:?}"),
    }
}

/// On-battery holding from t=0 to t=10 yields one outage-started
/// (confirmed at t=5, telemetry from t=0) and one outage-ended at t=10
/// with duration 10 s.
#[test]
fn ten_second_outage_reports_backdated_duration() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    // Onset snapshot carries telemetry that later drifts.
    let mut all = Vec::new();
    let script: &[(&str, &[(&str, &str)], u64)] = &[
        ("OL", &[], 0),
        ("OB", &[("battery.voltage", "24.7"), ("battery.runtime", "900")], 0),
        ("OB", &[("battery.voltage", "23.1")], 3),
        ("OB", &[("battery.voltage", "22.5")], 5),
        ("OB", &[("battery.voltage", "22.0")], 8),
        ("OL CHRG", &[("battery.voltage", "26.8"), ("battery.charge", "71")], 10),
    ];
    for (status, telemetry, offset) in script {
        let at = t0 + secs(*offset);
        for event in engine.tick(&snap(status, telemetry, at), at, &cfg) {
            all.push((*offset, event));
        }
    }

    let emitted: Vec<_> = all.iter().map(|(o, e)| (*o, e.name())).collect();
    assert_eq!(emitted, vec![(5, "outage_started"), (10, "outage_ended")]);

    match &all[0].1 {
        PowerEvent::OutageStarted { voltage, runtime, .. } => {
            // buffered onset telemetry, not the drifted values
            assert_eq!(voltage.as_f64(), Some(24.7));
            assert_eq!(runtime.as_f64(), Some(900.0));
        }
        other => panic!("expected outage start, got {other:?}"),
    }
    match &all[1].1 {
        PowerEvent::OutageEnded {
            duration,
            charge,
            voltage_before,
            voltage_after,
            charging,
        } => {
            assert_eq!(*duration, secs(10));
            assert_eq!(charge.as_f64(), Some(71.0));
            assert_eq!(voltage_before.as_f64(), Some(22.0));
            assert_eq!(voltage_after.as_f64(), Some(26.8));
            assert!(*charging);
        }
        other => panic!("expected outage end, got {other:?}"),
    }
}

/// A blip and a confirmed outage are mutually exclusive outcomes of one
/// candidate: never both.
#[test]
fn blip_never_produces_an_outage_pair() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[("OB", 0), ("OB", 2), ("OL", 4), ("OL", 6), ("OL", 8)],
    );
    let emitted: Vec<_> = events.iter().map(|(_, e)| e.name()).collect();
    assert_eq!(emitted, vec!["microcut"]);
}

/// Repeated identical ticks produce no duplicate events.
#[test]
fn unchanged_flags_are_idempotent() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    let mut events = drive(&mut engine, &cfg, t0, &[("OB", 0), ("OB", 5)]);
    assert_eq!(events.len(), 1); // outage_started only

    // a minute of steady on-battery ticks: nothing new
    events = drive(
        &mut engine,
        &cfg,
        t0,
        &[("OB", 10), ("OB", 20), ("OB", 30), ("OB", 60)],
    );
    assert!(events.is_empty());

    // recovery, then steady online ticks: one end, then nothing
    events = drive(&mut engine, &cfg, t0, &[("OL", 90), ("OL", 120), ("OL", 150)]);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].1, PowerEvent::OutageEnded { .. }));
}

/// With threshold 2 and a 900 s window, two microcuts 100 s apart
/// trigger exactly one burst; 1000 s apart they trigger none.
#[test]
fn burst_requires_cuts_inside_the_window() {
    let cfg = VigilCfg::default();

    let mut engine = Engine::new();
    let t0 = Instant::now();
    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[("OB", 0), ("OL", 3), ("OB", 100), ("OL", 103)],
    );
    let bursts: Vec<_> = events.iter().filter(|(_, e)| e.name() == "burst").collect();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].0, 103);

    let mut engine = Engine::new();
    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[("OB", 0), ("OL", 3), ("OB", 1000), ("OL", 1003)],
    );
    assert!(events.iter().all(|(_, e)| e.name() != "burst"));
}

/// Burst statistics aggregate both kinds and take the minimum numeric
/// charge, skipping unparseable values.
#[test]
fn burst_stats_aggregate_the_window() {
    let mut engine = Engine::new();
    let mut cfg = VigilCfg::default();
    cfg.cut_count_threshold = 3;
    let t0 = Instant::now();

    let mut all = Vec::new();
    let script: &[(&str, &[(&str, &str)], u64)] = &[
        // microcut, charge 80
        ("OB", &[], 0),
        ("OL", &[("battery.charge", "80")], 2),
        // confirmed outage of 20 s, charge unparseable
        ("OB", &[], 100),
        ("OB", &[], 105),
        ("OL", &[("battery.charge", "unknown")], 120),
        // microcut, charge 50: third cut in-window, burst fires
        ("OB", &[], 200),
        ("OL", &[("battery.charge", "50")], 203),
    ];
    for (status, telemetry, offset) in script {
        let at = t0 + secs(*offset);
        for event in engine.tick(&snap(status, telemetry, at), at, &cfg) {
            all.push(event);
        }
    }

    let burst = all
        .iter()
        .find_map(|e| match e {
            PowerEvent::Burst(stats) => Some(*stats),
            _ => None,
        })
        .expect("burst should fire on the third cut");
    assert_eq!(burst.micro_count, 2);
    assert_eq!(burst.normal_count, 1);
    assert_eq!(burst.total_duration, secs(2 + 20 + 3));
    assert_eq!(burst.min_charge, Some(50.0));
}

/// Low-battery alerts repeat at most once per minute and re-arm the
/// moment the flag clears.
#[test]
fn low_battery_cooldown_monotonicity() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[
            ("OB", 0),
            ("OB LB", 5),   // confirmation tick: first LB alert, no delay
            ("OB LB", 30),  // suppressed
            ("OB LB", 66),  // full minute elapsed, fires again
            ("OB", 70),     // flag clears, cooldown re-arms
            ("OB LB", 72),  // fires immediately
        ],
    );

    let lb_offsets: Vec<u64> = events
        .iter()
        .filter(|(_, e)| matches!(e, PowerEvent::LowBattery))
        .map(|(o, _)| *o)
        .collect();
    assert_eq!(lb_offsets, vec![5, 66, 72]);
}

/// Prolonged-outage alert fires at the threshold and repeats per report
/// interval until the outage ends.
#[test]
fn prolonged_outage_cadence() {
    let mut engine = Engine::new();
    let mut cfg = VigilCfg::default();
    cfg.long_battery_alert_secs = 60;
    cfg.report_interval_secs = 30;
    let t0 = Instant::now();

    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[
            ("OB", 0),
            ("OB", 5),
            ("OB", 59),  // under threshold
            ("OB", 61),  // first prolonged alert
            ("OB", 75),  // suppressed
            ("OB", 91),  // next interval
            ("OL", 100), // outage ends
        ],
    );

    let prolonged: Vec<u64> = events
        .iter()
        .filter(|(_, e)| matches!(e, PowerEvent::ProlongedOutage { .. }))
        .map(|(o, _)| *o)
        .collect();
    assert_eq!(prolonged, vec![61, 91]);
}

/// Charge-complete is reported exactly once after a charging recovery.
#[test]
fn charge_complete_after_recovery() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    let events = drive(
        &mut engine,
        &cfg,
        t0,
        &[
            ("OB", 0),
            ("OB", 5),
            ("OL CHRG", 10),
            ("OL CHRG", 60),
            ("OL", 120), // recharge finished
            ("OL", 180),
        ],
    );

    let charged: Vec<u64> = events
        .iter()
        .filter(|(_, e)| matches!(e, PowerEvent::ChargeComplete))
        .map(|(o, _)| *o)
        .collect();
    assert_eq!(charged, vec![120]);
}

/// An engine seeded mid-outage ends that outage normally and counts its
/// duration from boot.
#[test]
fn seeded_outage_resolves_normally() {
    let mut engine = Engine::new();
    let cfg = VigilCfg::default();
    let t0 = Instant::now();

    engine.seed(&snap("OB DISCHRG", &[("battery.voltage", "23.4")], t0), t0);
    assert_eq!(engine.state(), PowerState::OnBattery);

    let events = drive(&mut engine, &cfg, t0, &[("OB", 30), ("OL CHRG", 45)]);
    assert_eq!(events.len(), 1);
    match &events[0].1 {
        PowerEvent::OutageEnded { duration, .. } => assert_eq!(*duration, secs(45)),
        other => panic!("expected outage end, got {other:?}"),
    }
}
