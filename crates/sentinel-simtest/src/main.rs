//! Sentinel Headless Simulation Harness
//!
//! Validates the factory rules and the engine without LEDs, buzzer or
//! network. Runs entirely in-process on simulated time.
//!
//! Usage:
//!   cargo run -p sentinel-simtest
//!   cargo run -p sentinel-simtest -- --verbose
//!   cargo run -p sentinel-simtest -- --config floor.json --soak 2000 --seed 7

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentinel_core::prelude::*;
use sentinel_logic::actions::{ActionError, Effect};
use sentinel_logic::constants::{colors, CELL_COUNT};
use sentinel_logic::feedback::{BlinkChannel, Feedback};
use sentinel_logic::grid::{CellKind, Coord, Grid};
use sentinel_logic::render::LedLayout;
use sentinel_logic::resources::FuelType;
use sentinel_logic::visibility::{is_occluded, line_cells};
use tracing_subscriber::EnvFilter;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    config_path: Option<String>,
    soak_steps: u32,
    seed: u64,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Options {
            verbose: false,
            config_path: None,
            soak_steps: 500,
            seed: 42,
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => options.verbose = true,
                "--config" => options.config_path = args.next(),
                "--soak" => {
                    if let Some(n) = args.next().and_then(|v| v.parse().ok()) {
                        options.soak_steps = n;
                    }
                }
                "--seed" => {
                    if let Some(s) = args.next().and_then(|v| v.parse().ok()) {
                        options.seed = s;
                    }
                }
                other => eprintln!("ignoring unknown argument {:?}", other),
            }
        }
        options
    }
}

fn main() {
    let options = Options::from_args();

    let default_level = if options.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("=== Sentinel Simulation Harness ===\n");

    let config = match load_config(options.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_config(options.verbose));

    // 2. Visibility sweep
    results.extend(validate_visibility(options.verbose));

    // 3. Scripted scenarios on the default floor
    results.extend(validate_scenarios(options.verbose));

    // 4. Timers
    results.extend(validate_timers(options.verbose));

    // 5. Render pipeline
    results.extend(validate_render(options.verbose));

    // 6. Indicator playback
    results.extend(validate_indicator(options.verbose));

    // 7. Random soak on the configured floor
    results.extend(run_soak(&config, options.soak_steps, options.seed, options.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let config = SimConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    log::info!("Loaded config from {}", path);
    Ok(config)
}

fn headless(config: SimConfig) -> Result<SentinelEngine<MatrixBuffer, IndicatorPanel>, String> {
    SentinelEngine::headless(config).map_err(|e| e.to_string())
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let default = SimConfig::default();
    results.push(check(
        "config_default_valid",
        default.validate().is_ok(),
        format!(
            "fuel max {}, decay {}ms, replenish {}ms",
            default.fuel_max, default.decay_period_ms, default.replenish_delay_ms
        ),
    ));

    let partial = SimConfig::from_json(r#"{"replenish_delay_ms": 500}"#);
    results.push(check(
        "config_partial_override",
        matches!(&partial, Ok(c) if c.replenish_delay_ms == 500 && c.fuel_max == default.fuel_max),
        format!("{:?}", partial.as_ref().map(|c| c.replenish_delay_ms)),
    ));

    let rejected = [
        ("short_layout", r#"{"layout": ["....."]}"#),
        ("wide_row", r#"{"layout": ["......", ".....", ".....", ".....", "....."]}"#),
        ("unknown_symbol", r#"{"layout": ["....?", ".....", ".....", ".....", "....."]}"#),
        ("start_on_obstacle", r#"{"robot_start": {"x": 1, "y": 1}}"#),
        ("zero_decay", r#"{"decay_period_ms": 0}"#),
        ("zero_fuel_max", r#"{"fuel_max": 0}"#),
        ("not_json", "{"),
    ];
    for (case, json) in rejected {
        let result = SimConfig::from_json(json);
        if verbose {
            if let Err(e) = &result {
                println!("  {}: {}", case, e);
            }
        }
        results.push(check(
            &format!("config_rejects_{}", case),
            result.is_err(),
            "invalid config refused",
        ));
    }

    results
}

// ── 2. Visibility ───────────────────────────────────────────────────────

fn validate_visibility(verbose: bool) -> Vec<TestResult> {
    println!("--- Visibility ---");
    let mut results = Vec::new();
    let grid = Grid::default();

    // p → p is occluded only by an obstacle at p
    let bad_points: Vec<Coord> = Grid::coords()
        .filter(|&p| is_occluded(&grid, p, p) != grid.is_kind(p, CellKind::Obstacle))
        .collect();
    results.push(check(
        "visibility_point_rule",
        bad_points.is_empty(),
        format!("{} mismatched points", bad_points.len()),
    ));

    // Every line runs from its start to its end, one step at a time
    let mut broken = 0;
    for a in Grid::coords() {
        for b in Grid::coords() {
            let cells = line_cells(a, b);
            let stepwise = cells
                .windows(2)
                .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1);
            if cells.first() != Some(&a) || cells.last() != Some(&b) || !stepwise {
                broken += 1;
            }
        }
    }
    results.push(check(
        "visibility_lines_connected",
        broken == 0,
        format!("{} of 625 lines broken", broken),
    ));

    // Axis-aligned and 45° lines read the same both ways
    let mut asymmetric = 0;
    let mut checked = 0;
    for a in Grid::coords() {
        for b in Grid::coords() {
            let (dx, dy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
            if dx == 0 || dy == 0 || dx == dy {
                checked += 1;
                if is_occluded(&grid, a, b) != is_occluded(&grid, b, a) {
                    asymmetric += 1;
                }
            }
        }
    }
    results.push(check(
        "visibility_symmetric_on_axes_and_diagonals",
        asymmetric == 0,
        format!("{} pairs checked, {} asymmetric", checked, asymmetric),
    ));

    let start = Coord::new(2, 2);
    let visible = Grid::coords().filter(|&c| !is_occluded(&grid, start, c)).count();
    if verbose {
        println!("  {} of {} cells visible from {}", visible, CELL_COUNT, start);
    }
    results.push(check(
        "visibility_intruder_hidden_from_start",
        is_occluded(&grid, start, Coord::new(0, 2)),
        "obstacle column blocks (0, 2)",
    ));

    results
}

// ── 3. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let mut engine = match headless(SimConfig::default()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("scenario_engine", false, e));
            return results;
        }
    };

    // Blocked move toward the obstacle column
    let report = engine.handle_command("left");
    let blocked = report
        .as_ref()
        .map(|r| r.errors().eq([ActionError::InvalidMove]))
        .unwrap_or(false);
    results.push(check(
        "scenario_blocked_move",
        blocked && engine.state().robot.position == Coord::new(2, 2),
        format!("robot at {}", engine.state().robot.position),
    ));
    results.push(check(
        "scenario_blocked_move_blinks_red",
        engine.feedback().lit_channel() == Some(BlinkChannel::Red),
        format!("{:?}", engine.feedback().lit_channel()),
    ));

    // Walk up to the intruder and capture it
    for name in ["up", "up", "left", "left", "down"] {
        engine.handle_command(name);
    }
    let spotted = engine.state().intruder_detected;
    let report = engine.handle_command("capture");
    let captured = report
        .as_ref()
        .map(|r| r.effects().eq([Effect::Captured]))
        .unwrap_or(false);
    results.push(check(
        "scenario_capture",
        spotted
            && captured
            && !engine.state().intruder_detected
            && engine.state().grid.count(CellKind::Intruder) == 0,
        format!("spotted={} captured={}", spotted, captured),
    ));
    if verbose {
        if let Some(frame) = engine.frame() {
            println!("{}", frame.to_ascii());
        }
    }

    // Collect from station 1 and feed machine 1 once it has burned a unit
    let mut engine = match headless(SimConfig::default()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("scenario_engine", false, e));
            return results;
        }
    };
    for name in ["right", "right", "up", "collect"] {
        engine.handle_command(name);
    }
    let carrying = engine.state().robot.carried_fuel == Some(FuelType::Type1)
        && !engine.state().resources.station(FuelType::Type1).available;
    results.push(check("scenario_collect", carrying, engine.status().summary()));

    let refused = engine
        .handle_command("collect")
        .map(|r| r.errors().eq([ActionError::ResourceUnavailable]))
        .unwrap_or(false);
    results.push(check(
        "scenario_collect_while_carrying",
        refused && engine.state().robot.carried_fuel == Some(FuelType::Type1),
        "second collect refused",
    ));

    engine.handle_command("left");
    let decay_ms = engine.config().decay_period_ms;
    engine.update(decay_ms);
    let delivered = engine
        .handle_command("deliver")
        .map(|r| r.effects().eq([Effect::Delivered(FuelType::Type1)]))
        .unwrap_or(false);
    results.push(check(
        "scenario_deliver",
        delivered && engine.status().machine_levels == [2, 1],
        engine.status().summary(),
    ));

    results
}

// ── 4. Timers ───────────────────────────────────────────────────────────

fn validate_timers(_verbose: bool) -> Vec<TestResult> {
    println!("--- Timers ---");
    let mut results = Vec::new();

    let mut engine = match headless(SimConfig::default()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("timers_engine", false, e));
            return results;
        }
    };
    let replenish_ms = engine.config().replenish_delay_ms;
    let decay_ms = engine.config().decay_period_ms;

    for name in ["right", "right", "up", "collect"] {
        engine.handle_command(name);
    }
    engine.update(replenish_ms - 1);
    let still_drained = !engine.state().resources.station(FuelType::Type1).available;
    engine.update(1);
    let back = engine.state().resources.station(FuelType::Type1).available;
    results.push(check(
        "timers_replenish_on_time",
        still_drained && back,
        format!("station back at {}ms", engine.now_ms()),
    ));

    engine.update(decay_ms - replenish_ms - 1);
    let before = engine.status().machine_levels;
    engine.update(1);
    let after = engine.status().machine_levels;
    results.push(check(
        "timers_decay_on_period",
        before == [2, 2] && after == [1, 1],
        format!("{:?} -> {:?} at {}ms", before, after, engine.now_ms()),
    ));

    engine.update(decay_ms * 10);
    results.push(check(
        "timers_decay_floors_at_zero",
        engine.status().machine_levels == [0, 0]
            && engine.scheduler().pending_for(Task::DecayFuel) == 1,
        format!("{} timers pending", engine.scheduler().pending()),
    ));

    results
}

// ── 5. Render ───────────────────────────────────────────────────────────

fn validate_render(verbose: bool) -> Vec<TestResult> {
    println!("--- Render ---");
    let mut results = Vec::new();

    for layout in [LedLayout::RowMajor, LedLayout::Serpentine] {
        let mut seen = [false; CELL_COUNT];
        for cell in Grid::coords() {
            if let Some(slot) = seen.get_mut(layout.index(cell)) {
                *slot = true;
            }
        }
        results.push(check(
            &format!("render_{:?}_covers_every_led", layout).to_lowercase(),
            seen.iter().all(|&s| s),
            "25 distinct indices",
        ));
    }

    let mut engine = match headless(SimConfig::default()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("render_engine", false, e));
            return results;
        }
    };
    engine.update(0);
    let leds = engine.leds();
    results.push(check(
        "render_single_commit",
        leds.writes == CELL_COUNT && leds.commits == 1,
        format!("{} writes, {} commits", leds.writes, leds.commits),
    ));
    results.push(check(
        "render_robot_at_centre",
        leds.shown()[12] == colors::ROBOT,
        format!("{:?}", leds.shown()[12]),
    ));
    results.push(check(
        "render_hidden_intruder_unlit",
        leds.shown()[10] == colors::UNLIT && !engine.state().intruder_detected,
        "intruder behind obstacles stays dark",
    ));
    if verbose {
        if let Some(frame) = engine.frame() {
            println!("{}", frame.to_ascii());
        }
    }

    engine.update(200);
    results.push(check(
        "render_skipped_when_clean",
        engine.render_count() == 1,
        format!("{} renders", engine.render_count()),
    ));

    results
}

// ── 6. Indicator ────────────────────────────────────────────────────────

fn validate_indicator(_verbose: bool) -> Vec<TestResult> {
    println!("--- Indicator ---");
    let mut results = Vec::new();

    for feedback in [Feedback::Success, Feedback::Failure] {
        let blink = feedback.blink();
        let mut panel = IndicatorPanel::new();
        panel.blink(blink, 0);

        let mut changes = 0;
        let mut lit = panel.is_lit(blink.channel);
        let mut now = 0;
        while !panel.is_idle() && now < 10_000 {
            now += 50;
            panel.tick(now);
            if panel.is_lit(blink.channel) != lit {
                lit = !lit;
                changes += 1;
            }
        }
        let expected = 2 * blink.repeats - 1;
        results.push(check(
            &format!("indicator_{:?}_blink_changes", feedback).to_lowercase(),
            changes == expected && !lit,
            format!("{} changes, expected {}", changes, expected),
        ));
    }

    results
}

// ── 7. Soak ─────────────────────────────────────────────────────────────

const SOAK_COMMANDS: [&str; 8] = [
    "up", "down", "left", "right", "capture", "deliver", "collect", "noise",
];

fn run_soak(config: &SimConfig, steps: u32, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Soak ({} steps, seed {}) ---", steps, seed);
    let mut results = Vec::new();

    let mut engine = match headless(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("soak_engine", false, e));
            return results;
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let intruders_at_start = engine.state().grid.count(CellKind::Intruder);
    let fuel_max = config.fuel_max;
    let mut violations: Vec<String> = Vec::new();
    let mut captures = 0;
    let mut deliveries = 0;

    for step in 0..steps {
        if rng.gen_bool(0.7) {
            let name = SOAK_COMMANDS[rng.gen_range(0..SOAK_COMMANDS.len())];
            engine.submit(name);
        }
        let delta = rng.gen_range(0..=config.poll_interval_ms * 5);
        let before = engine.state().clone();
        engine.update(delta);
        let state = engine.state();

        captures += before
            .grid
            .count(CellKind::Intruder)
            .saturating_sub(state.grid.count(CellKind::Intruder));
        if state.robot.carried_fuel.is_none() && before.robot.carried_fuel.is_some() {
            deliveries += 1;
        }

        let pos = state.robot.position;
        if !state.grid.is_kind(pos, CellKind::Empty) {
            violations.push(format!(
                "step {}: robot on {:?} at {}",
                step,
                state.grid.kind_at(pos),
                pos
            ));
        }
        for fuel in FuelType::ALL {
            let machine = state.resources.machine(fuel);
            if machine.level > fuel_max {
                violations.push(format!(
                    "step {}: {} machine at {}",
                    step,
                    fuel.label(),
                    machine.level
                ));
            }
            let waiting = engine.scheduler().pending_for(Task::Replenish(fuel));
            if !state.resources.station(fuel).available && waiting != 1 {
                violations.push(format!(
                    "step {}: {} station drained with {} timers",
                    step,
                    fuel.label(),
                    waiting
                ));
            }
        }
        if state.grid.count(CellKind::Intruder) > intruders_at_start {
            violations.push(format!("step {}: intruder appeared", step));
        }
        if state.is_dirty() {
            violations.push(format!("step {}: dirty after update", step));
        }
        if engine.scheduler().pending_for(Task::DecayFuel) != 1 {
            violations.push(format!("step {}: decay tick lost", step));
        }
    }

    if verbose {
        match serde_json::to_string_pretty(&engine.status()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("status encode failed: {}", e),
        }
        println!("  {}", engine.status().summary());
        println!(
            "  {}ms simulated, {} renders, {} captures, {} deliveries",
            engine.now_ms(),
            engine.render_count(),
            captures,
            deliveries
        );
        for v in violations.iter().take(10) {
            println!("  {}", v);
        }
    }

    results.push(check(
        "soak_invariants_hold",
        violations.is_empty(),
        format!("{} violations over {} steps", violations.len(), steps),
    ));
    results.push(check(
        "soak_status_serializes",
        engine.status_json().is_ok(),
        "status report encodes as JSON",
    ));

    results
}
