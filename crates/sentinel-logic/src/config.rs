//! Simulation configuration - device constants and factory layout.
//!
//! `SimConfig::default()` is the device as shipped. A JSON override only
//! needs the fields it changes; everything else falls back to the
//! defaults. The floor stays 5×5.

use serde::{Deserialize, Serialize};

use crate::constants::{timing, FUEL_MAX};
use crate::grid::{CellKind, Coord, Grid, DEFAULT_LAYOUT};
use crate::render::LedLayout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum fuel a machine holds.
    pub fuel_max: u8,
    /// Period of the machine decay tick.
    pub decay_period_ms: u64,
    /// Cooldown before a drained station is available again.
    pub replenish_delay_ms: u64,
    /// Floor layout, one row string per `y`.
    pub layout: Vec<String>,
    pub robot_start: Coord,
    pub led_layout: LedLayout,
    /// Cadence of the harness main loop.
    pub poll_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fuel_max: FUEL_MAX,
            decay_period_ms: timing::DECAY_PERIOD_MS,
            replenish_delay_ms: timing::REPLENISH_DELAY_MS,
            layout: DEFAULT_LAYOUT.iter().map(|r| r.to_string()).collect(),
            robot_start: Coord::new(2, 2),
            led_layout: LedLayout::RowMajor,
            poll_interval_ms: timing::POLL_INTERVAL_MS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the floor described by `layout`.
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::from_rows(self.layout.as_slice())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuel_max == 0 {
            return Err(ConfigError::ZeroFuelMax);
        }
        if self.decay_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod("decay_period_ms"));
        }
        if self.replenish_delay_ms == 0 {
            return Err(ConfigError::ZeroPeriod("replenish_delay_ms"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPeriod("poll_interval_ms"));
        }

        let grid = self.grid()?;
        if !grid.is_kind(self.robot_start, CellKind::Empty) {
            return Err(ConfigError::RobotStart(self.robot_start));
        }
        Ok(())
    }
}

/// Errors that can occur while loading a configuration
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    LayoutRows { found: usize },
    LayoutColumns { row: usize, found: usize },
    UnknownSymbol { row: usize, symbol: char },
    RobotStart(Coord),
    ZeroFuelMax,
    ZeroPeriod(&'static str),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::LayoutRows { found } => {
                write!(f, "Layout must have 5 rows, found {}", found)
            }
            ConfigError::LayoutColumns { row, found } => {
                write!(f, "Layout row {} must have 5 cells, found {}", row, found)
            }
            ConfigError::UnknownSymbol { row, symbol } => {
                write!(f, "Unknown layout symbol '{}' in row {}", symbol, row)
            }
            ConfigError::RobotStart(at) => {
                write!(f, "Robot start {} is off the floor or not empty", at)
            }
            ConfigError::ZeroFuelMax => write!(f, "fuel_max must be at least 1"),
            ConfigError::ZeroPeriod(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

impl std::error::Error for ConfigError {}
