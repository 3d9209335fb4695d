//! Factory floor model - cell kinds, coordinates and the fixed layout.
//!
//! The floor is a fixed 5×5 grid indexed `[y][x]`, with `y = 0` the top
//! row. Cell kinds never change at runtime except `Intruder → Empty`.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::GRID_SIZE;
use crate::resources::FuelType;

/// Integer grid coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE && self.y >= 0 && self.y < GRID_SIZE
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Adjacency scan order used by deliver, collect and capture.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit delta. `Up` decreases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Machine1,
    Machine2,
    Intruder,
    FuelStation1,
    FuelStation2,
    Obstacle,
}

impl CellKind {
    /// Parse a layout symbol (`.` `1` `2` `!` `a` `b` `#`).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(CellKind::Empty),
            '1' => Some(CellKind::Machine1),
            '2' => Some(CellKind::Machine2),
            '!' => Some(CellKind::Intruder),
            'a' => Some(CellKind::FuelStation1),
            'b' => Some(CellKind::FuelStation2),
            '#' => Some(CellKind::Obstacle),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Machine1 => '1',
            CellKind::Machine2 => '2',
            CellKind::Intruder => '!',
            CellKind::FuelStation1 => 'a',
            CellKind::FuelStation2 => 'b',
            CellKind::Obstacle => '#',
        }
    }

    /// Fuel type consumed, if this is a machine.
    pub fn machine_fuel(self) -> Option<FuelType> {
        match self {
            CellKind::Machine1 => Some(FuelType::Type1),
            CellKind::Machine2 => Some(FuelType::Type2),
            _ => None,
        }
    }

    /// Fuel type supplied, if this is a fuel station.
    pub fn station_fuel(self) -> Option<FuelType> {
        match self {
            CellKind::FuelStation1 => Some(FuelType::Type1),
            CellKind::FuelStation2 => Some(FuelType::Type2),
            _ => None,
        }
    }
}

/// The default factory floor, one string per row from `y = 0`.
pub const DEFAULT_LAYOUT: [&str; 5] = ["...1a", ".#...", "!#...", ".#...", "...2b"];

const SIZE: usize = GRID_SIZE as usize;

/// Fixed-size floor of cell kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[CellKind; SIZE]; SIZE],
}

impl Grid {
    /// Build a grid from layout rows. Exactly five rows of five symbols.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ConfigError> {
        if rows.len() != SIZE {
            return Err(ConfigError::LayoutRows { found: rows.len() });
        }

        let mut cells = [[CellKind::Empty; SIZE]; SIZE];
        for (y, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.as_ref().chars().collect();
            if symbols.len() != SIZE {
                return Err(ConfigError::LayoutColumns {
                    row: y,
                    found: symbols.len(),
                });
            }
            for (x, &symbol) in symbols.iter().enumerate() {
                cells[y][x] = CellKind::from_symbol(symbol)
                    .ok_or(ConfigError::UnknownSymbol { row: y, symbol })?;
            }
        }

        Ok(Self { cells })
    }

    /// Kind at `at`, or `None` when off the grid.
    pub fn kind_at(&self, at: Coord) -> Option<CellKind> {
        if at.in_bounds() {
            Some(self.cells[at.y as usize][at.x as usize])
        } else {
            None
        }
    }

    pub fn is_kind(&self, at: Coord, kind: CellKind) -> bool {
        self.kind_at(at) == Some(kind)
    }

    /// Turn an intruder into an empty cell. Returns whether anything changed.
    pub fn clear_intruder(&mut self, at: Coord) -> bool {
        if !self.is_kind(at, CellKind::Intruder) {
            return false;
        }
        self.cells[at.y as usize][at.x as usize] = CellKind::Empty;
        true
    }

    /// In-bounds orthogonal neighbours, in [`Direction::ALL`] order.
    pub fn neighbors(&self, at: Coord) -> impl Iterator<Item = Coord> {
        Direction::ALL
            .into_iter()
            .map(move |d| at.step(d))
            .filter(|c| c.in_bounds())
    }

    /// Every coordinate, row by row from the top.
    pub fn coords() -> impl Iterator<Item = Coord> {
        (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Coord::new(x, y)))
    }

    pub fn count(&self, kind: CellKind) -> usize {
        Self::coords().filter(|&c| self.is_kind(c, kind)).count()
    }

    /// Layout rows in the same notation [`Grid::from_rows`] accepts.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|k| k.symbol()).collect())
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        let mut cells = [[CellKind::Empty; SIZE]; SIZE];
        for (y, row) in DEFAULT_LAYOUT.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                cells[y][x] = CellKind::from_symbol(symbol).unwrap_or(CellKind::Empty);
            }
        }
        Self { cells }
    }
}
