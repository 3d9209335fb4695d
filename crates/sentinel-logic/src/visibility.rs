//! Line-of-sight occlusion over the factory floor.
//!
//! Algorithm: integer line traversal with an accumulated error term.
//! 1. `dx = |to.x - from.x|`, `dy = |to.y - from.y|`, `err = dx - dy`
//! 2. Test the current cell; stop at `to`
//! 3. `e2 = 2 * err`; step x when `e2 > -dy`, step y when `e2 < dx`
//!
//! Both conditions can hold in one iteration, so diagonal lines advance
//! on both axes at once and always terminate. The start and end cells
//! are tested like every other visited cell.
//!
//! The traversal is directional: for lines that are neither axis-aligned
//! nor 45°, swapping the endpoints can visit a different middle cell.

use crate::grid::{CellKind, Coord, Grid};

/// Cells visited walking from `from` to `to`, both included.
pub fn line_cells(from: Coord, to: Coord) -> Vec<Coord> {
    let mut cells = Vec::new();
    walk(from, to, |cell| {
        cells.push(cell);
        false
    });
    cells
}

/// Whether any obstacle lies on the line from `from` to `to`.
pub fn is_occluded(grid: &Grid, from: Coord, to: Coord) -> bool {
    walk(from, to, |cell| grid.is_kind(cell, CellKind::Obstacle))
}

/// Visit each cell until `stop` returns true (returns true) or `to` is
/// reached (returns false).
fn walk(from: Coord, to: Coord, mut stop: impl FnMut(Coord) -> bool) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut err = dx - dy;
    let mut cell = from;

    loop {
        if stop(cell) {
            return true;
        }
        if cell == to {
            return false;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            cell.x += sx;
        }
        if e2 < dx {
            err += dx;
            cell.y += sy;
        }
    }
}
