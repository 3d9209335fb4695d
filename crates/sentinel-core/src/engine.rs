//! Simulation engine - the single context that owns the factory state
//!
//! Every stimulus (an inbound command, a decay tick, a replenish timer)
//! runs to completion here before the next one starts, and the render
//! pass only ever runs between them.

use std::collections::VecDeque;

use sentinel_logic::actions::{decay_tick, replenish_station, ActionError, ActionReport, Effect};
use sentinel_logic::commands::Command;
use sentinel_logic::config::{ConfigError, SimConfig};
use sentinel_logic::feedback::Feedback;
use sentinel_logic::render::{render_pass, Frame};
use sentinel_logic::state::FactoryState;
use sentinel_logic::status::StatusReport;

use crate::indicator::IndicatorPanel;
use crate::scheduler::{Scheduler, Task};
use crate::sinks::{FeedbackSink, LedSink, MatrixBuffer};

/// Main simulation engine
pub struct SentinelEngine<L, F> {
    state: FactoryState,
    config: SimConfig,
    scheduler: Scheduler,
    /// Raw command names waiting for the next update
    inbox: VecDeque<String>,
    leds: L,
    feedback: F,
    /// Simulated milliseconds since start
    now_ms: u64,
    frame: Option<Frame>,
    render_count: u64,
}

impl SentinelEngine<MatrixBuffer, IndicatorPanel> {
    /// Engine wired to in-memory sinks.
    pub fn headless(config: SimConfig) -> Result<Self, ConfigError> {
        Self::new(config, MatrixBuffer::new(), IndicatorPanel::new())
    }
}

impl<L: LedSink, F: FeedbackSink> SentinelEngine<L, F> {
    /// Build the factory from `config` and arm the decay tick.
    pub fn new(config: SimConfig, leds: L, feedback: F) -> Result<Self, ConfigError> {
        let state = FactoryState::from_config(&config)?;
        let mut scheduler = Scheduler::new();
        scheduler.schedule_every(0, config.decay_period_ms, Task::DecayFuel);

        log::info!(
            "Sentinel engine ready: robot at {}, decay every {}ms, replenish after {}ms",
            state.robot.position,
            config.decay_period_ms,
            config.replenish_delay_ms
        );

        Ok(Self {
            state,
            config,
            scheduler,
            inbox: VecDeque::new(),
            leds,
            feedback,
            now_ms: 0,
            frame: None,
            render_count: 0,
        })
    }

    /// Queue a command name for the next `update`.
    pub fn submit(&mut self, name: impl Into<String>) {
        self.inbox.push_back(name.into());
    }

    /// Resolve and run a command name right away. Unknown names are
    /// dropped: no mutation, no feedback, no render.
    pub fn handle_command(&mut self, name: &str) -> Option<ActionReport> {
        let Some(command) = Command::parse(name) else {
            log::debug!("Ignoring unknown command {:?}", name);
            return None;
        };
        Some(self.dispatch(command))
    }

    /// Run a command, raise its feedback, arm any replenish timers and
    /// render.
    pub fn dispatch(&mut self, command: Command) -> ActionReport {
        let report = command.apply(&mut self.state);
        self.log_report(command, &report);

        for feedback in report.feedback() {
            self.signal(feedback);
        }
        for &fuel in &report.replenish {
            self.scheduler.schedule_once(
                self.now_ms,
                self.config.replenish_delay_ms,
                Task::Replenish(fuel),
            );
        }

        self.render();
        report
    }

    /// Advance the clock by `delta_ms`.
    ///
    /// Queued commands run first, in arrival order, at the current time.
    /// Timers due within the step then fire in due order, each with the
    /// clock set to its due time. A render follows if anything changed.
    pub fn update(&mut self, delta_ms: u64) {
        while let Some(name) = self.inbox.pop_front() {
            self.handle_command(&name);
        }

        let target = self.now_ms.saturating_add(delta_ms);
        while let Some((due_ms, task)) = self.scheduler.pop_due(target) {
            self.now_ms = due_ms;
            self.run_task(task);
        }
        self.now_ms = target;

        if self.state.is_dirty() {
            self.render();
        }
        self.feedback.tick(self.now_ms);
    }

    /// One iteration of the cooperative loop.
    pub fn poll(&mut self) {
        self.update(self.config.poll_interval_ms);
    }

    /// Full render pass: one write per cell, then a single commit.
    pub fn render(&mut self) {
        let was_detected = self.state.intruder_detected;
        let frame = render_pass(&mut self.state, self.config.led_layout);

        for write in frame.writes() {
            self.leds.set_led(write.index, write.color);
        }
        self.leds.write();

        if self.state.intruder_detected && !was_detected {
            log::warn!("Intruder detected!");
        }
        self.render_count += 1;
        self.frame = Some(frame);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::DecayFuel => {
                decay_tick(&mut self.state);
                log::debug!(
                    "Decay tick at {}ms: machine levels {:?}",
                    self.now_ms,
                    self.status().machine_levels
                );
            }
            Task::Replenish(fuel) => {
                if replenish_station(&mut self.state, fuel) {
                    log::info!("{} station replenished at {}ms", fuel.label(), self.now_ms);
                } else {
                    log::warn!(
                        "{} station replenish at {}ms found it already available",
                        fuel.label(),
                        self.now_ms
                    );
                }
            }
        }
    }

    fn signal(&mut self, feedback: Feedback) {
        self.feedback.beep(feedback.tone(), self.now_ms);
        self.feedback.blink(feedback.blink(), self.now_ms);
    }

    fn log_report(&self, command: Command, report: &ActionReport) {
        for outcome in &report.outcomes {
            match outcome.result {
                Ok(Effect::Moved(_)) => {
                    log::debug!("Robot moved {} to {}", command, outcome.target)
                }
                Ok(Effect::Delivered(fuel)) => {
                    log::info!("Delivered {} to machine at {}", fuel.label(), outcome.target)
                }
                Ok(Effect::Collected(fuel)) => {
                    log::info!("Collected {} from station at {}", fuel.label(), outcome.target)
                }
                Ok(Effect::Captured) => log::info!("Intruder captured at {}", outcome.target),
                Err(ActionError::NoTargetAdjacent) => {
                    log::debug!("{}: {}", command, ActionError::NoTargetAdjacent)
                }
                Err(e) => log::warn!("{} rejected at {}: {}", command, outcome.target, e),
            }
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn state(&self) -> &FactoryState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Last frame drawn, if any render has happened.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn pending_commands(&self) -> usize {
        self.inbox.len()
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn status(&self) -> StatusReport {
        StatusReport::from_state(&self.state)
    }

    pub fn status_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.status())
    }
}
