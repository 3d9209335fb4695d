//! Engine scenarios under simulated time.
//!
//! Exercises: command queue → actions → timers → render pass → sinks
//!
//! Sinks are the in-memory recorders; the clock only moves via `update`.

use sentinel_core::prelude::*;
use sentinel_core::sinks::Signal;
use sentinel_logic::constants::colors;
use sentinel_logic::feedback::{BlinkChannel, Feedback};
use sentinel_logic::grid::{CellKind, Coord};
use sentinel_logic::render::LedLayout;
use sentinel_logic::resources::FuelType;

// ── Helpers ────────────────────────────────────────────────────────────

type TestEngine = SentinelEngine<MatrixBuffer, FeedbackLog>;

fn engine_with(config: SimConfig) -> TestEngine {
    SentinelEngine::new(config, MatrixBuffer::new(), FeedbackLog::new()).unwrap()
}

fn default_engine() -> TestEngine {
    engine_with(SimConfig::default())
}

fn run_all(engine: &mut TestEngine, names: &[&str]) {
    for name in names {
        engine
            .handle_command(name)
            .unwrap_or_else(|| panic!("unknown command {}", name));
    }
}

fn led_at(engine: &TestEngine, cell: Coord) -> sentinel_logic::render::Rgb {
    let index = engine.config().led_layout.index(cell);
    engine.leds().shown()[index]
}

// ── Timers ─────────────────────────────────────────────────────────────

#[test]
fn station_replenishes_exactly_after_delay() {
    let mut engine = default_engine();
    engine.update(1000);
    run_all(&mut engine, &["right", "right", "up", "collect"]);
    assert!(!engine.state().resources.station(FuelType::Type1).available);
    assert_eq!(engine.state().robot.carried_fuel, Some(FuelType::Type1));

    let before = engine.state().clone();
    engine.update(2999);
    assert!(!engine.state().resources.station(FuelType::Type1).available);

    engine.update(1);
    assert_eq!(engine.now_ms(), 4000);
    let after = engine.state();
    assert!(after.resources.station(FuelType::Type1).available);
    assert_eq!(after.robot, before.robot);
    assert_eq!(after.grid, before.grid);
    for fuel in FuelType::ALL {
        assert_eq!(after.resources.machine(fuel), before.resources.machine(fuel));
    }
    assert_eq!(led_at(&engine, Coord::new(4, 0)), colors::STATION_AVAILABLE);
}

#[test]
fn replenish_fires_once() {
    let mut engine = default_engine();
    run_all(&mut engine, &["right", "right", "up", "collect"]);
    assert_eq!(engine.scheduler().pending_for(Task::Replenish(FuelType::Type1)), 1);

    engine.update(3000);
    assert_eq!(engine.scheduler().pending_for(Task::Replenish(FuelType::Type1)), 0);
    assert_eq!(engine.scheduler().pending_for(Task::DecayFuel), 1);
}

#[test]
fn decay_ticks_every_period_and_floors_at_zero() {
    let mut engine = default_engine();
    engine.update(8999);
    assert_eq!(engine.status().machine_levels, [2, 2]);
    let renders = engine.render_count();

    engine.update(1);
    assert_eq!(engine.status().machine_levels, [1, 1]);
    assert_eq!(engine.render_count(), renders + 1);
    assert_eq!(led_at(&engine, Coord::new(3, 0)), colors::MACHINE_LOW);

    engine.update(9000);
    assert_eq!(engine.status().machine_levels, [0, 0]);
    engine.update(90_000);
    assert_eq!(engine.status().machine_levels, [0, 0]);
    // Still armed after many ticks.
    assert_eq!(engine.scheduler().pending_for(Task::DecayFuel), 1);
}

#[test]
fn one_long_step_fires_every_due_tick() {
    let config = SimConfig {
        fuel_max: 5,
        ..SimConfig::default()
    };
    let mut engine = engine_with(config);
    engine.update(27_000);
    assert_eq!(engine.status().machine_levels, [2, 2]);
    assert_eq!(engine.status().fuel_max, 5);
    // Part-full on a deeper tank still reads as low, not empty.
    assert_eq!(led_at(&engine, Coord::new(3, 0)), colors::MACHINE_LOW);
}

#[test]
fn replenish_delay_at_the_end_of_the_clock_never_fires() {
    let config = SimConfig::from_json(r#"{"replenish_delay_ms": 18446744073709551615}"#).unwrap();
    let mut engine = engine_with(config);
    engine.update(1);
    run_all(&mut engine, &["right", "right", "up", "collect"]);
    assert_eq!(engine.scheduler().pending_for(Task::Replenish(FuelType::Type1)), 1);
    assert_eq!(engine.scheduler().next_due(), Some(9000));

    engine.update(60_000);
    assert_eq!(engine.now_ms(), 60_001);
    assert!(!engine.state().resources.station(FuelType::Type1).available);
    assert_eq!(engine.scheduler().pending_for(Task::Replenish(FuelType::Type1)), 1);
    assert_eq!(engine.scheduler().pending_for(Task::DecayFuel), 1);
}

// ── Command flow ───────────────────────────────────────────────────────

#[test]
fn capture_walk_through_the_queue() {
    let mut engine = default_engine();
    for name in ["up", "up", "left", "left", "down"] {
        engine.submit(name);
    }
    engine.poll();
    assert_eq!(engine.state().robot.position, Coord::new(0, 1));
    assert!(engine.state().intruder_detected);
    assert_eq!(led_at(&engine, Coord::new(0, 2)), colors::INTRUDER);
    assert!(engine.feedback().signals.is_empty());

    engine.submit("capture");
    engine.poll();
    let state = engine.state();
    assert!(state.grid.is_kind(Coord::new(0, 2), CellKind::Empty));
    assert!(!state.intruder_detected);
    assert_eq!(led_at(&engine, Coord::new(0, 2)), colors::UNLIT);
    assert_eq!(
        engine.feedback().signals,
        vec![
            (200, Signal::Beep(Feedback::Success.tone())),
            (200, Signal::Blink(Feedback::Success.blink()))
        ]
    );
}

#[test]
fn deliver_after_decay() {
    let mut engine = default_engine();
    run_all(&mut engine, &["right", "right", "up", "collect", "left"]);
    engine.update(9000);

    let report = engine.handle_command("deliver").unwrap();
    assert!(report.any_succeeded());
    assert_eq!(engine.status().machine_levels, [2, 1]);
    assert_eq!(engine.status().carried_fuel, None);
}

#[test]
fn failed_move_signals_once() {
    let mut engine = default_engine();
    engine.update(0);
    let commits = engine.leds().commits;

    engine.handle_command("left");
    assert_eq!(engine.state().robot.position, Coord::new(2, 2));
    assert_eq!(engine.feedback().beeps().count(), 1);
    assert_eq!(
        engine.feedback().blinks().next().map(|b| b.channel),
        Some(BlinkChannel::Red)
    );
    assert_eq!(engine.leds().commits, commits + 1);
}

#[test]
fn unknown_commands_leave_no_trace() {
    let mut engine = default_engine();
    engine.update(0);
    let commits = engine.leds().commits;

    engine.submit("/favicon.ico");
    engine.submit("");
    engine.poll();
    assert_eq!(engine.leds().commits, commits);
    assert!(engine.feedback().signals.is_empty());
    assert_eq!(engine.state().robot.position, Coord::new(2, 2));
}

// ── Rendering ──────────────────────────────────────────────────────────

#[test]
fn initial_frame_on_the_matrix() {
    let mut engine = default_engine();
    engine.update(0);

    let shown = engine.leds().shown();
    assert_eq!(shown[12], colors::ROBOT);
    // Machine 1 at (3,0) sits on the last physical row.
    assert_eq!(shown[23], colors::MACHINE_FULL);
    assert_eq!(shown[24], colors::STATION_AVAILABLE);
    // Intruder hidden behind the obstacle column.
    assert_eq!(shown[10], colors::UNLIT);
    assert!(!engine.state().intruder_detected);
}

#[test]
fn serpentine_layout_is_honoured() {
    let config = SimConfig {
        led_layout: LedLayout::Serpentine,
        ..SimConfig::default()
    };
    let mut engine = engine_with(config);
    engine.update(0);

    let robot_index = LedLayout::Serpentine.index(Coord::new(2, 2));
    assert_eq!(engine.leds().shown()[robot_index], colors::ROBOT);
    assert_eq!(engine.leds().writes, 25);
}

// ── Status ─────────────────────────────────────────────────────────────

#[test]
fn status_json_reports_the_floor() {
    let mut engine = default_engine();
    run_all(&mut engine, &["right", "right", "up", "collect"]);

    let json: serde_json::Value = serde_json::from_str(&engine.status_json().unwrap()).unwrap();
    assert_eq!(json["robot_position"], serde_json::json!({"x": 4, "y": 1}));
    assert_eq!(json["carried_fuel"], "Type1");
    assert_eq!(json["stations_available"], serde_json::json!([false, true]));
    assert_eq!(json["intruder_detected"], false);
}
