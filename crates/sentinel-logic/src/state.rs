//! The state aggregate - everything the simulation mutates, in one place.
//!
//! `FactoryState` is owned by whoever runs the serialized execution
//! context and passed by reference into every operation. Nothing else
//! holds a copy.

use crate::config::{ConfigError, SimConfig};
use crate::grid::Grid;
use crate::resources::Resources;
use crate::robot::Robot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryState {
    pub grid: Grid,
    pub robot: Robot,
    pub resources: Resources,
    /// Set when a render pass draws a visible intruder, cleared by capture.
    pub intruder_detected: bool,
    dirty: bool,
}

impl FactoryState {
    /// The factory as configured. Starts dirty so the first pass renders.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: config.grid()?,
            robot: Robot::new(config.robot_start),
            resources: Resources::new(config.fuel_max),
            intruder_detected: false,
            dirty: true,
        })
    }

    /// Default robot and resources on a custom floor.
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for FactoryState {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            robot: Robot::default(),
            resources: Resources::default(),
            intruder_detected: false,
            dirty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[test]
    fn starts_dirty_and_take_clears() {
        let mut state = FactoryState::default();
        assert!(state.is_dirty());
        assert!(state.take_dirty());
        assert!(!state.is_dirty());
        assert!(!state.take_dirty());
        state.mark_dirty();
        assert!(state.is_dirty());
    }

    #[test]
    fn default_config_builds_default_state() {
        let state = FactoryState::from_config(&SimConfig::default()).unwrap();
        assert_eq!(state, FactoryState::default());
        assert_eq!(state.robot.position, Coord::new(2, 2));
        assert!(state.robot.carried_fuel.is_none());
    }
}
