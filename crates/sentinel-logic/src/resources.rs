//! Fuel bookkeeping - machine levels and fuel station availability.
//!
//! Each fuel type has exactly one machine (consumer) and one station
//! (source). Machine levels live in `[0, fuel_max]`; stations flip to
//! unavailable on collect and back once their replenish timer fires.

use serde::{Deserialize, Serialize};

use crate::constants::FUEL_MAX;

/// The two fuel types. Each machine burns one, each station supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Type1,
    Type2,
}

impl FuelType {
    pub const ALL: [FuelType; 2] = [FuelType::Type1, FuelType::Type2];

    fn index(self) -> usize {
        match self {
            FuelType::Type1 => 0,
            FuelType::Type2 => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Type1 => "Type 1",
            FuelType::Type2 => "Type 2",
        }
    }
}

/// Fuel consumer with a bounded level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub level: u8,
    pub max: u8,
}

impl Machine {
    pub fn full(max: u8) -> Self {
        Self { level: max, max }
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.max
    }

    /// Add one unit, capped at `max`.
    pub fn refuel(&mut self) {
        self.level = self.level.saturating_add(1).min(self.max);
    }

    /// Burn one unit, floored at zero.
    pub fn burn(&mut self) {
        self.level = self.level.saturating_sub(1);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::full(FUEL_MAX)
    }
}

/// Fuel source with a respawn cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelStation {
    pub available: bool,
}

impl Default for FuelStation {
    fn default() -> Self {
        Self { available: true }
    }
}

/// Both machines and both stations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    machines: [Machine; 2],
    stations: [FuelStation; 2],
}

impl Resources {
    /// Full machines and available stations.
    pub fn new(fuel_max: u8) -> Self {
        Self {
            machines: [Machine::full(fuel_max); 2],
            stations: [FuelStation::default(); 2],
        }
    }

    pub fn machine(&self, fuel: FuelType) -> &Machine {
        &self.machines[fuel.index()]
    }

    pub fn machine_mut(&mut self, fuel: FuelType) -> &mut Machine {
        &mut self.machines[fuel.index()]
    }

    pub fn station(&self, fuel: FuelType) -> &FuelStation {
        &self.stations[fuel.index()]
    }

    pub fn station_mut(&mut self, fuel: FuelType) -> &mut FuelStation {
        &mut self.stations[fuel.index()]
    }

    /// Periodic decay: every machine loses one unit, floored at zero.
    pub fn decay(&mut self) {
        for machine in &mut self.machines {
            machine.burn();
        }
    }

    /// Mark a station available again. Returns whether it was drained.
    pub fn replenish(&mut self, fuel: FuelType) -> bool {
        let station = self.station_mut(fuel);
        let was_drained = !station.available;
        station.available = true;
        was_drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_level_stays_in_bounds() {
        let mut m = Machine::full(2);
        m.refuel();
        assert_eq!(m.level, 2);
        m.burn();
        m.burn();
        m.burn();
        assert_eq!(m.level, 0);
        m.refuel();
        assert_eq!(m.level, 1);
        assert!(!m.is_full());
    }

    #[test]
    fn decay_floors_every_machine() {
        let mut r = Resources::new(FUEL_MAX);
        for _ in 0..5 {
            r.decay();
        }
        for fuel in FuelType::ALL {
            assert_eq!(r.machine(fuel).level, 0);
        }
    }

    #[test]
    fn replenish_reports_drained_stations() {
        let mut r = Resources::default();
        assert!(!r.replenish(FuelType::Type1));
        r.station_mut(FuelType::Type2).available = false;
        assert!(r.replenish(FuelType::Type2));
        assert!(r.station(FuelType::Type2).available);
        assert!(r.station(FuelType::Type1).available);
    }
}
