//! The robot - where it stands and what it carries.

use serde::{Deserialize, Serialize};

use crate::grid::{CellKind, Coord, Direction, Grid};
use crate::resources::FuelType;

/// Robot position and carried fuel. Carries at most one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub position: Coord,
    pub carried_fuel: Option<FuelType>,
}

impl Robot {
    pub fn new(position: Coord) -> Self {
        Self {
            position,
            carried_fuel: None,
        }
    }

    /// Target cell for a move, or `None` when it is off the grid or not
    /// empty.
    pub fn move_target(&self, grid: &Grid, direction: Direction) -> Option<Coord> {
        let target = self.position.step(direction);
        if grid.is_kind(target, CellKind::Empty) {
            Some(target)
        } else {
            None
        }
    }

    pub fn is_carrying(&self) -> bool {
        self.carried_fuel.is_some()
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new(Coord::new(2, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_target_respects_bounds_and_cells() {
        let grid = Grid::default();
        let robot = Robot::default();
        assert_eq!(
            robot.move_target(&grid, Direction::Up),
            Some(Coord::new(2, 1))
        );
        assert_eq!(robot.move_target(&grid, Direction::Left), None);

        let corner = Robot::new(Coord::new(0, 0));
        assert_eq!(corner.move_target(&grid, Direction::Up), None);
        assert_eq!(
            corner.move_target(&grid, Direction::Down),
            Some(Coord::new(0, 1))
        );

        let by_machine = Robot::new(Coord::new(2, 0));
        assert_eq!(by_machine.move_target(&grid, Direction::Right), None);
    }
}
