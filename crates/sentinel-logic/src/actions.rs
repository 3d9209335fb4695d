//! Robot actions - move, deliver, collect, capture, plus the timer-driven
//! decay and replenish mutations.
//!
//! Each action mutates the state aggregate directly and returns an
//! [`ActionReport`]: one [`Outcome`] per target it acted on, the feedback
//! owed to the operator and any replenish timers the caller must
//! schedule. Rejections are values, never faults.
//!
//! Deliver, collect and capture scan the four neighbours of the robot in
//! up, down, left, right order and evaluate each one independently, so a
//! single call can produce several outcomes.

use crate::feedback::Feedback;
use crate::grid::{CellKind, Coord, Direction};
use crate::resources::FuelType;
use crate::state::FactoryState;

/// Why an action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionError {
    /// Destination off the floor or not empty.
    InvalidMove,
    /// Machine full, wrong or no fuel carried, robot already carrying, or
    /// station drained.
    ResourceUnavailable,
    /// Nothing the action applies to next to the robot.
    NoTargetAdjacent,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::InvalidMove => write!(f, "destination blocked or off the floor"),
            ActionError::ResourceUnavailable => write!(f, "resource unavailable"),
            ActionError::NoTargetAdjacent => write!(f, "no target adjacent"),
        }
    }
}

impl std::error::Error for ActionError {}

/// What a successful action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Moved(Direction),
    Delivered(FuelType),
    Collected(FuelType),
    Captured,
}

/// Result of acting on one target cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub target: Coord,
    pub result: Result<Effect, ActionError>,
}

impl Outcome {
    /// Feedback owed for this outcome. A move that lands is silent, and
    /// so is `NoTargetAdjacent`.
    pub fn feedback(&self) -> Option<Feedback> {
        match self.result {
            Ok(Effect::Moved(_)) => None,
            Ok(_) => Some(Feedback::Success),
            Err(ActionError::NoTargetAdjacent) => None,
            Err(_) => Some(Feedback::Failure),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub outcomes: Vec<Outcome>,
    /// Stations drained by this action; each needs a one-shot replenish.
    pub replenish: Vec<FuelType>,
}

impl ActionReport {
    fn single(target: Coord, result: Result<Effect, ActionError>) -> Self {
        Self {
            outcomes: vec![Outcome { target, result }],
            replenish: Vec::new(),
        }
    }

    /// Feedback signals in outcome order.
    pub fn feedback(&self) -> Vec<Feedback> {
        self.outcomes.iter().filter_map(Outcome::feedback).collect()
    }

    pub fn effects(&self) -> impl Iterator<Item = Effect> + '_ {
        self.outcomes.iter().filter_map(|o| o.result.ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = ActionError> + '_ {
        self.outcomes.iter().filter_map(|o| o.result.err())
    }

    pub fn any_succeeded(&self) -> bool {
        self.effects().next().is_some()
    }
}

/// Step the robot one cell. Only empty, in-bounds cells can be entered.
pub fn try_move(state: &mut FactoryState, direction: Direction) -> ActionReport {
    let target = state.robot.position.step(direction);
    match state.robot.move_target(&state.grid, direction) {
        Some(target) => {
            state.robot.position = target;
            state.mark_dirty();
            ActionReport::single(target, Ok(Effect::Moved(direction)))
        }
        None => ActionReport::single(target, Err(ActionError::InvalidMove)),
    }
}

/// Hand carried fuel to every adjacent machine that accepts it.
pub fn try_deliver(state: &mut FactoryState) -> ActionReport {
    scan_neighbors(state, |state, _, kind| {
        let fuel = kind.machine_fuel()?;
        let machine = state.resources.machine(fuel);
        if machine.is_full() || state.robot.carried_fuel != Some(fuel) {
            return Some(Err(ActionError::ResourceUnavailable));
        }

        state.resources.machine_mut(fuel).refuel();
        state.robot.carried_fuel = None;
        state.mark_dirty();
        Some(Ok(Effect::Delivered(fuel)))
    })
}

/// Pick up fuel from an adjacent available station, if empty-handed.
pub fn try_collect(state: &mut FactoryState) -> ActionReport {
    let mut report = scan_neighbors(state, |state, _, kind| {
        let fuel = kind.station_fuel()?;
        if state.robot.is_carrying() || !state.resources.station(fuel).available {
            return Some(Err(ActionError::ResourceUnavailable));
        }

        state.resources.station_mut(fuel).available = false;
        state.robot.carried_fuel = Some(fuel);
        state.mark_dirty();
        Some(Ok(Effect::Collected(fuel)))
    });

    report.replenish = report
        .effects()
        .filter_map(|e| match e {
            Effect::Collected(fuel) => Some(fuel),
            _ => None,
        })
        .collect();
    report
}

/// Clear every adjacent intruder.
pub fn try_capture(state: &mut FactoryState) -> ActionReport {
    scan_neighbors(state, |state, target, kind| {
        if kind != CellKind::Intruder {
            return None;
        }
        state.grid.clear_intruder(target);
        state.intruder_detected = false;
        state.mark_dirty();
        Some(Ok(Effect::Captured))
    })
}

/// Periodic decay tick: every machine burns one unit.
pub fn decay_tick(state: &mut FactoryState) {
    state.resources.decay();
    state.mark_dirty();
}

/// Replenish timer body: the station is available again. Returns
/// whether it had been drained.
pub fn replenish_station(state: &mut FactoryState, fuel: FuelType) -> bool {
    let was_drained = state.resources.replenish(fuel);
    state.mark_dirty();
    was_drained
}

/// Run `act` on each in-bounds neighbour. `act` returns `None` for cells
/// it does not apply to. With no applicable neighbour the report holds a
/// single `NoTargetAdjacent` outcome at the robot's position.
fn scan_neighbors<F>(state: &mut FactoryState, mut act: F) -> ActionReport
where
    F: FnMut(&mut FactoryState, Coord, CellKind) -> Option<Result<Effect, ActionError>>,
{
    let origin = state.robot.position;
    let targets: Vec<Coord> = state.grid.neighbors(origin).collect();

    let mut report = ActionReport::default();
    for target in targets {
        let Some(kind) = state.grid.kind_at(target) else {
            continue;
        };
        if let Some(result) = act(state, target, kind) {
            report.outcomes.push(Outcome { target, result });
        }
    }

    if report.outcomes.is_empty() {
        return ActionReport::single(origin, Err(ActionError::NoTargetAdjacent));
    }
    report
}
