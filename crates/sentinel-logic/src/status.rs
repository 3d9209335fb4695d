//! Status report - what the remote status page shows.

use serde::{Deserialize, Serialize};

use crate::grid::Coord;
use crate::resources::FuelType;
use crate::state::FactoryState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Machine 1 and machine 2 fuel levels.
    pub machine_levels: [u8; 2],
    pub fuel_max: u8,
    pub intruder_detected: bool,
    pub robot_position: Coord,
    pub carried_fuel: Option<FuelType>,
    /// Station 1 and station 2 availability.
    pub stations_available: [bool; 2],
}

impl StatusReport {
    pub fn from_state(state: &FactoryState) -> Self {
        let r = &state.resources;
        Self {
            machine_levels: FuelType::ALL.map(|f| r.machine(f).level),
            fuel_max: r.machine(FuelType::Type1).max,
            intruder_detected: state.intruder_detected,
            robot_position: state.robot.position,
            carried_fuel: state.robot.carried_fuel,
            stations_available: FuelType::ALL.map(|f| r.station(f).available),
        }
    }

    /// Label for the carried fuel, `"None"` when empty-handed.
    pub fn carried_label(&self) -> &'static str {
        self.carried_fuel.map(FuelType::label).unwrap_or("None")
    }

    /// One-line summary for logs and the harness.
    pub fn summary(&self) -> String {
        format!(
            "machine 1: {}/{} | machine 2: {}/{} | intruder: {} | position: {} | fuel: {}",
            self.machine_levels[0],
            self.fuel_max,
            self.machine_levels[1],
            self.fuel_max,
            if self.intruder_detected { "DETECTED" } else { "none" },
            self.robot_position,
            self.carried_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_state() {
        let mut state = FactoryState::default();
        state.resources.machine_mut(FuelType::Type2).burn();
        state.robot.carried_fuel = Some(FuelType::Type1);
        state.resources.station_mut(FuelType::Type1).available = false;

        let status = StatusReport::from_state(&state);
        assert_eq!(status.machine_levels, [2, 1]);
        assert_eq!(status.stations_available, [false, true]);
        assert_eq!(status.carried_label(), "Type 1");
        assert_eq!(
            status.summary(),
            "machine 1: 2/2 | machine 2: 1/2 | intruder: none | position: (2, 2) | fuel: Type 1"
        );
    }

    #[test]
    fn serializes_for_status_pages() {
        let status = StatusReport::from_state(&FactoryState::default());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["machine_levels"], serde_json::json!([2, 2]));
        assert_eq!(json["robot_position"]["x"], 2);
        assert!(json["carried_fuel"].is_null());
    }
}
