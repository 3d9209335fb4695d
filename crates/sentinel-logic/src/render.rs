//! Render rules - what colour each cell shows on the LED matrix.
//!
//! For every cell the first matching rule in [`RENDER_RULES`] wins:
//!
//! | # | Rule | Needs line of sight |
//! |---|------|---------------------|
//! | 1 | robot's own cell | no |
//! | 2 | obstacle | no |
//! | 3 | machine, one rule per fuel type, coloured by fuel level | yes |
//! | 4 | fuel station, one rule per fuel type, coloured by availability | yes |
//! | 5 | intruder | yes |
//! | 6 | unlit | no |
//!
//! The matrix is addressed with the vertical axis inverted: logical row 0
//! is the last physical row.

use serde::{Deserialize, Serialize};

use crate::constants::{colors, CELL_COUNT, GRID_SIZE};
use crate::grid::{CellKind, Coord, Grid};
use crate::resources::FuelType;
use crate::state::FactoryState;
use crate::visibility::is_occluded;

/// One LED colour. Channels are kept in 0..=20.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_lit(&self) -> bool {
        self.r > 0 || self.g > 0 || self.b > 0
    }
}

/// A render rule, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderRule {
    Robot,
    Obstacle,
    Machine(FuelType),
    Station(FuelType),
    Intruder,
    Unlit,
}

/// Rules matched top to bottom per cell. Machines and stations get one
/// rule per fuel type.
pub const RENDER_RULES: [RenderRule; 8] = [
    RenderRule::Robot,
    RenderRule::Obstacle,
    RenderRule::Machine(FuelType::Type1),
    RenderRule::Machine(FuelType::Type2),
    RenderRule::Station(FuelType::Type1),
    RenderRule::Station(FuelType::Type2),
    RenderRule::Intruder,
    RenderRule::Unlit,
];

impl RenderRule {
    /// Whether this rule applies to a cell.
    fn matches(self, state: &FactoryState, cell: Coord, kind: CellKind) -> bool {
        match self {
            RenderRule::Robot => cell == state.robot.position,
            RenderRule::Obstacle => kind == CellKind::Obstacle,
            RenderRule::Machine(fuel) => kind.machine_fuel() == Some(fuel),
            RenderRule::Station(fuel) => kind.station_fuel() == Some(fuel),
            RenderRule::Intruder => kind == CellKind::Intruder,
            RenderRule::Unlit => true,
        }
    }

    /// Whether this rule is suppressed when the cell is out of sight.
    pub fn needs_line_of_sight(self) -> bool {
        matches!(
            self,
            RenderRule::Machine(_) | RenderRule::Station(_) | RenderRule::Intruder
        )
    }

    /// Colour for a matched rule.
    pub fn color(self, state: &FactoryState) -> Rgb {
        match self {
            RenderRule::Robot => colors::ROBOT,
            RenderRule::Obstacle => colors::OBSTACLE,
            RenderRule::Machine(fuel) => {
                let machine = state.resources.machine(fuel);
                machine_color(machine.level, machine.max)
            }
            RenderRule::Station(fuel) => {
                if state.resources.station(fuel).available {
                    colors::STATION_AVAILABLE
                } else {
                    colors::STATION_DRAINED
                }
            }
            RenderRule::Intruder => colors::INTRUDER,
            RenderRule::Unlit => colors::UNLIT,
        }
    }
}

/// Three-step ramp: full, empty, and anything in between.
pub fn machine_color(level: u8, max: u8) -> Rgb {
    if level >= max {
        colors::MACHINE_FULL
    } else if level == 0 {
        colors::MACHINE_EMPTY
    } else {
        colors::MACHINE_LOW
    }
}

/// First matching rule for `cell`. Line of sight is only computed when
/// a gated rule would otherwise match.
pub fn classify(state: &FactoryState, cell: Coord) -> RenderRule {
    let kind = state.grid.kind_at(cell).unwrap_or(CellKind::Empty);
    let mut visible: Option<bool> = None;

    for rule in RENDER_RULES {
        if !rule.matches(state, cell, kind) {
            continue;
        }
        if rule.needs_line_of_sight() {
            let seen = *visible
                .get_or_insert_with(|| !is_occluded(&state.grid, state.robot.position, cell));
            if !seen {
                continue;
            }
        }
        return rule;
    }
    RenderRule::Unlit
}

/// How logical `(x, y)` maps onto the physical LED strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedLayout {
    /// `index = y_inverted * 5 + x`.
    #[default]
    RowMajor,
    /// Strip snakes back and forth, numbered from the far corner.
    Serpentine,
}

impl LedLayout {
    pub fn index(self, cell: Coord) -> usize {
        let y_inverted = (GRID_SIZE - 1) - cell.y;
        let index = match self {
            LedLayout::RowMajor => y_inverted * GRID_SIZE + cell.x,
            LedLayout::Serpentine => {
                let last = GRID_SIZE * GRID_SIZE - 1;
                if y_inverted % 2 == 0 {
                    last - (y_inverted * GRID_SIZE + cell.x)
                } else {
                    last - (y_inverted * GRID_SIZE + (GRID_SIZE - 1 - cell.x))
                }
            }
        };
        index as usize
    }
}

/// One LED write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedWrite {
    pub index: usize,
    pub color: Rgb,
}

/// A full pass: one colour per cell, in grid order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: [Rgb; CELL_COUNT],
    layout: LedLayout,
    /// Whether any visible intruder was drawn.
    pub intruder_seen: bool,
}

impl Frame {
    pub fn color_at(&self, cell: Coord) -> Option<Rgb> {
        cell.in_bounds()
            .then(|| self.cells[(cell.y * GRID_SIZE + cell.x) as usize])
    }

    /// LED writes in grid order, top row first.
    pub fn writes(&self) -> impl Iterator<Item = LedWrite> + '_ {
        Grid::coords().zip(self.cells.iter()).map(|(cell, &color)| LedWrite {
            index: self.layout.index(cell),
            color,
        })
    }

    /// Colours indexed by LED position.
    pub fn by_led(&self) -> [Rgb; CELL_COUNT] {
        let mut leds = [Rgb::default(); CELL_COUNT];
        for write in self.writes() {
            leds[write.index] = write.color;
        }
        leds
    }

    /// One character per cell, as the floor looks from above.
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for (i, color) in self.cells.iter().enumerate() {
            out.push(ascii_glyph(*color));
            if (i as i32 + 1) % GRID_SIZE == 0 {
                out.push('\n');
            }
        }
        out
    }
}

fn ascii_glyph(color: Rgb) -> char {
    match color {
        c if c == colors::UNLIT => ' ',
        c if c == colors::ROBOT => 'R',
        c if c == colors::OBSTACLE => '#',
        c if c == colors::MACHINE_FULL => 'M',
        c if c == colors::MACHINE_LOW => 'm',
        c if c == colors::MACHINE_EMPTY => '_',
        c if c == colors::STATION_AVAILABLE => 'F',
        c if c == colors::STATION_DRAINED => 'f',
        c if c == colors::INTRUDER => '!',
        _ => '?',
    }
}

/// Compute a frame without touching the state.
pub fn compose_frame(state: &FactoryState, layout: LedLayout) -> Frame {
    let mut cells = [Rgb::default(); CELL_COUNT];
    let mut intruder_seen = false;

    for (slot, cell) in cells.iter_mut().zip(Grid::coords()) {
        let rule = classify(state, cell);
        if rule == RenderRule::Intruder {
            intruder_seen = true;
        }
        *slot = rule.color(state);
    }

    Frame {
        cells,
        layout,
        intruder_seen,
    }
}

/// A render pass: clear the dirty flag, compose the frame and latch the
/// intruder flag when one is drawn.
pub fn render_pass(state: &mut FactoryState, layout: LedLayout) -> Frame {
    state.take_dirty();
    let frame = compose_frame(state, layout);
    if frame.intruder_seen {
        state.intruder_detected = true;
    }
    frame
}
