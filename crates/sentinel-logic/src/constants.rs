//! Device constants - grid size, fuel bounds, timings, tones and colours.
//!
//! Plain values shared by the pure logic, the engine and the harness.

/// Width and height of the factory floor.
pub const GRID_SIZE: i32 = 5;

/// Number of cells (and LEDs) on the floor.
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Maximum fuel a machine can hold.
pub const FUEL_MAX: u8 = 2;

pub mod timing {
    /// Period of the machine fuel decay tick.
    pub const DECAY_PERIOD_MS: u64 = 9000;
    /// Delay before a drained fuel station becomes available again.
    pub const REPLENISH_DELAY_MS: u64 = 3000;
    /// Cadence of the cooperative main loop on the device.
    pub const POLL_INTERVAL_MS: u64 = 200;
}

pub mod tones {
    pub const SUCCESS_HZ: u32 = 2000;
    pub const FAILURE_HZ: u32 = 1000;
    pub const DURATION_MS: u32 = 200;
    pub const SUCCESS_REPEATS: u32 = 3;
    pub const FAILURE_REPEATS: u32 = 2;
}

/// Colour values written to the LED matrix. Channels stay in 0..=20 to
/// keep the matrix dim.
pub mod colors {
    use crate::render::Rgb;

    pub const UNLIT: Rgb = Rgb::new(0, 0, 0);
    /// Grey.
    pub const ROBOT: Rgb = Rgb::new(1, 1, 1);
    /// White.
    pub const OBSTACLE: Rgb = Rgb::new(10, 10, 10);
    /// Orange, machine full.
    pub const MACHINE_FULL: Rgb = Rgb::new(13, 2, 0);
    /// Yellow, machine at one unit.
    pub const MACHINE_LOW: Rgb = Rgb::new(20, 20, 0);
    /// Dim yellow, machine empty.
    pub const MACHINE_EMPTY: Rgb = Rgb::new(1, 1, 0);
    pub const STATION_AVAILABLE: Rgb = Rgb::new(20, 0, 20);
    pub const STATION_DRAINED: Rgb = Rgb::new(1, 0, 1);
    pub const INTRUDER: Rgb = Rgb::new(20, 0, 0);
}
