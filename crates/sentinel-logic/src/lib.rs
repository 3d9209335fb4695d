//! Pure simulation logic for the sentinel robot.
//!
//! A robot patrols a fixed 5×5 factory floor, keeps two machines fuelled
//! from two respawning fuel stations and captures intruders it can reach.
//! This crate holds every rule of that simulation as plain data and plain
//! functions: no clock, no timers, no drivers. Operations return what
//! happened (outcomes, feedback to emit, timers to schedule) and the
//! caller decides how to deliver it.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Move, deliver, collect and capture against the state aggregate |
//! | [`commands`] | Fixed command names and their mapping to actions |
//! | [`config`] | Device constants, layout and validation |
//! | [`constants`] | Grid size, fuel bounds, timings, tones and colours |
//! | [`feedback`] | Success/failure signals and blink/tone playback patterns |
//! | [`grid`] | Cell kinds, coordinates, directions and the factory layout |
//! | [`render`] | Ordered render rules, colour ramps and LED index mapping |
//! | [`resources`] | Machine fuel levels and fuel station availability |
//! | [`robot`] | Robot position and carried fuel |
//! | [`state`] | The single state aggregate and its dirty flag |
//! | [`status`] | Serializable status report for remote status pages |
//! | [`visibility`] | Supercover line traversal occlusion test |

pub mod actions;
pub mod commands;
pub mod config;
pub mod constants;
pub mod feedback;
pub mod grid;
pub mod render;
pub mod resources;
pub mod robot;
pub mod state;
pub mod status;
pub mod visibility;
