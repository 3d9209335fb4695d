//! Command names - the fixed remote-control vocabulary.
//!
//! The transport hands over a bare name (`up`, `capture`, ...). Anything
//! that does not resolve to a [`Command`] is dropped by the caller with
//! no mutation, no feedback and no render.

use serde::{Deserialize, Serialize};

use crate::actions::{try_capture, try_collect, try_deliver, try_move, ActionReport};
use crate::grid::Direction;
use crate::state::FactoryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Capture,
    Deliver,
    Collect,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Move(Direction::Up),
        Command::Move(Direction::Down),
        Command::Move(Direction::Left),
        Command::Move(Direction::Right),
        Command::Capture,
        Command::Deliver,
        Command::Collect,
    ];

    /// Resolve a command name. Case-insensitive; a leading `/` (route
    /// form) is accepted.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix('/').unwrap_or(name).to_ascii_lowercase();
        match name.as_str() {
            "up" => Some(Command::Move(Direction::Up)),
            "down" => Some(Command::Move(Direction::Down)),
            "left" => Some(Command::Move(Direction::Left)),
            "right" => Some(Command::Move(Direction::Right)),
            "capture" => Some(Command::Capture),
            "deliver" => Some(Command::Deliver),
            "collect" => Some(Command::Collect),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Move(direction) => direction.name(),
            Command::Capture => "capture",
            Command::Deliver => "deliver",
            Command::Collect => "collect",
        }
    }

    /// Run the action this command names.
    pub fn apply(self, state: &mut FactoryState) -> ActionReport {
        match self {
            Command::Move(direction) => try_move(state, direction),
            Command::Capture => try_capture(state),
            Command::Deliver => try_deliver(state),
            Command::Collect => try_collect(state),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[test]
    fn names_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Some(command));
        }
    }

    #[test]
    fn parse_accepts_route_form_and_case() {
        assert_eq!(Command::parse("/up"), Some(Command::Move(Direction::Up)));
        assert_eq!(Command::parse(" Capture "), Some(Command::Capture));
        assert_eq!(Command::parse("COLLECT"), Some(Command::Collect));
    }

    #[test]
    fn unknown_names_resolve_to_nothing() {
        for name in ["", "jump", "up2", "/", "favicon.ico", "move up"] {
            assert_eq!(Command::parse(name), None, "{:?}", name);
        }
    }

    #[test]
    fn apply_dispatches_to_the_action() {
        let mut state = FactoryState::default();
        let report = Command::Move(Direction::Down).apply(&mut state);
        assert!(report.any_succeeded());
        assert_eq!(state.robot.position, Coord::new(2, 3));
    }
}
