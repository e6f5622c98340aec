//! Dashboard loop integration tests: the end-to-end scenarios driven through
//! the public library API with scripted providers and event sources.

mod common;

use std::fs;
use std::time::Duration;

use fan_dashboard::prelude::*;

fn settings(raw: bool) -> DashboardSettings {
    DashboardSettings {
        interval: Duration::from_millis(300),
        raw,
        color: false,
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// ══════════════════════════════════════════════════════════════════
// Scenario A/B: normalization through the loop
// ══════════════════════════════════════════════════════════════════

#[test]
fn auto_mode_fan_shows_not_applicable() {
    // rampDown is absent from the raw read and still ends up marked.
    let raw = Snapshot::new()
        .with(FieldId::Fan1Mode, "auto")
        .with(FieldId::Fan1Level, 72)
        .with(FieldId::Fan1RampUp, "3");
    let provider = ScriptedProvider::constant(raw);
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    dashboard.run(&mut ScriptedEvents::default()).unwrap();

    for id in [FieldId::Fan1Level, FieldId::Fan1RampUp, FieldId::Fan1RampDown] {
        assert_eq!(dashboard.snapshot().get(id), Some(&Value::NotApplicable), "{id}");
    }
    let out = text(dashboard.writer());
    assert_eq!(out.matches(&format!("{:<15}", "N/A")).count(), 3);
    assert!(out.contains("[auto]"));
}

#[test]
fn curve_mode_fan_is_unchanged() {
    let raw = Snapshot::new()
        .with(FieldId::Fan2Mode, "curve")
        .with(FieldId::Fan2RampUp, "5")
        .with(FieldId::Fan2RampDown, "2")
        .with(FieldId::Fan2Level, 50);
    let provider = ScriptedProvider::constant(raw.clone());
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    dashboard.run(&mut ScriptedEvents::default()).unwrap();
    assert_eq!(dashboard.snapshot(), &raw);
}

// ══════════════════════════════════════════════════════════════════
// Scenario C/D: thresholds and the 80x24 layout
// ══════════════════════════════════════════════════════════════════

#[test]
fn rpm_thresholds_are_upper_inclusive() {
    let style = |n: i64| format_value(&Value::Integer(n), FormatKind::RpmWithThresholds).style;
    assert_eq!(style(1199), Style::Low);
    assert_eq!(style(1200), Style::Mid);
    assert_eq!(style(3000), Style::High);
}

#[test]
fn fourth_block_wraps_to_second_column() {
    let map = compute_layout(Dimensions::new(24, 80), &Registry::builtin());
    let placed: Vec<(BlockId, u16, u16)> =
        map.blocks().iter().map(|b| (b.block, b.row, b.col)).collect();
    assert_eq!(
        placed,
        vec![
            (BlockId::Fan1, 2, 0),
            (BlockId::Fan2, 8, 0),
            (BlockId::RampCurves, 14, 0),
            (BlockId::ThermalPower, 2, 40),
        ]
    );
    assert_eq!(
        map.coordinate(FieldId::PowerMode),
        Some(ScreenCoordinate { row: 6, col: 60 })
    );
}

// ══════════════════════════════════════════════════════════════════
// Scenario E: resize mid-wait
// ══════════════════════════════════════════════════════════════════

#[test]
fn resize_repaints_with_cached_snapshot() {
    let provider = ScriptedProvider::new();
    provider.push(Ok(Snapshot::new().with(FieldId::Fan1Rpm, 1000)));
    provider.push(Ok(Snapshot::new().with(FieldId::Fan1Rpm, 2000)));

    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    let mut events = ScriptedEvents::new([
        LoopEvent::ResizeRequested(Dimensions::new(30, 120)),
        LoopEvent::TickElapsed,
    ]);
    dashboard.run(&mut events).unwrap();
    assert_eq!(provider.calls(), 2, "resize must not poll");

    let out = text(&dashboard.into_writer());
    // Clears: initial chrome, resize chrome, shutdown.
    let frames: Vec<&str> = out.split("\x1b[2J").collect();
    assert_eq!(frames.len(), 4);

    let resized = frames[2];
    assert!(resized.contains("terminal 120x30"));
    let cached = resized.find("1000 RPM").expect("cached value repainted");
    let fresh = resized.find("2000 RPM").expect("next tick drawn");
    assert!(cached < fresh);
    assert!(!frames[1].contains("2000 RPM"));
}

#[test]
fn resize_keeps_tick_cadence() {
    let provider = ScriptedProvider::constant(Snapshot::new());
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    let mut events = ScriptedEvents::new([
        LoopEvent::ResizeRequested(Dimensions::new(40, 100)),
        LoopEvent::ResizeRequested(Dimensions::new(12, 160)),
    ]);
    dashboard.run(&mut events).unwrap();

    let deadlines = events.deadlines();
    assert_eq!(deadlines.len(), 3);
    assert!(deadlines.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn shrinking_below_minimum_hides_everything() {
    let provider = ScriptedProvider::constant(Snapshot::new().with(FieldId::TempCurrent, 40));
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    let mut events = ScriptedEvents::new([
        LoopEvent::ResizeRequested(Dimensions::new(8, 80)),
        LoopEvent::TickElapsed,
    ]);
    dashboard.run(&mut events).unwrap();

    assert!(dashboard.layout().is_empty());
    assert_eq!(dashboard.layout().dropped_blocks(), 4);
    let out = text(dashboard.writer());
    let frames: Vec<&str> = out.split("\x1b[2J").collect();
    assert!(frames[2].contains("terminal too small"));
    assert!(!frames[2].contains("40°C"));
}

// ══════════════════════════════════════════════════════════════════
// Registry and provider wiring
// ══════════════════════════════════════════════════════════════════

#[test]
fn custom_registry_limits_blocks() {
    let provider = ScriptedProvider::constant(Snapshot::new());
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(false))
            .with_registry(Registry::builtin().truncated(2));
    dashboard.run(&mut ScriptedEvents::default()).unwrap();

    assert_eq!(dashboard.layout().blocks().len(), 2);
    let out = text(dashboard.writer());
    assert!(out.contains("Fan 2"));
    assert!(!out.contains("Ramp Curves"));
}

#[test]
fn sysfs_backed_dashboard_renders_readings() {
    let dir = tempfile::tempdir().unwrap();
    common::full_sysfs_tree(dir.path());
    let provider = SysfsProvider::new(dir.path(), "ec_fan");
    provider.check_present().unwrap();

    let mut dashboard =
        Dashboard::new(provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    dashboard
        .run(&mut ScriptedEvents::new([LoopEvent::TickElapsed]))
        .unwrap();
    assert_eq!(dashboard.polls(), 2);

    let out = text(dashboard.writer());
    assert!(out.contains("1500 RPM"));
    assert!(out.contains("3200 RPM"));
    assert!(out.contains("55°C"));
    assert!(out.contains("[curve]"));
    assert!(out.contains("balanced"));
}

#[test]
fn unreadable_sensor_stops_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    common::full_sysfs_tree(dir.path());
    fs::remove_file(dir.path().join(FieldId::Fan2Rpm.sysfs_name())).unwrap();

    let provider = SysfsProvider::new(dir.path(), "ec_fan");
    let mut dashboard =
        Dashboard::new(provider, Vec::new(), Dimensions::new(24, 80), settings(false));
    let err = dashboard
        .run(&mut ScriptedEvents::new([LoopEvent::TickElapsed]))
        .unwrap_err();

    assert!(err.is_acquisition());
    assert_eq!(dashboard.phase(), Phase::ShuttingDown);
    assert!(text(dashboard.writer()).ends_with("\x1b[?25h"));
}

#[test]
fn shutdown_from_signal_is_clean() {
    let provider = ScriptedProvider::constant(Snapshot::new());
    let mut dashboard =
        Dashboard::new(&provider, Vec::new(), Dimensions::new(24, 80), settings(true));
    let cause = dashboard
        .run(&mut ScriptedEvents::new([
            LoopEvent::TickElapsed,
            LoopEvent::ShutdownRequested(ShutdownCause::Signal(2)),
            LoopEvent::TickElapsed,
        ]))
        .unwrap();
    assert_eq!(cause, ShutdownCause::Signal(2));
    assert_eq!(provider.calls(), 2, "no poll after shutdown");
}
