//! Turn processing.
//!
//! - `GameEngine`: the command surface of a game
//! - `TurnEngine`: validates commands and applies them to a `Game`
//! - `Command`: the closed set of client commands, and `dispatch`

pub mod command;
pub mod engine;
pub mod turn_engine;

pub use command::{dispatch, Command, CommandTag};
pub use engine::{GameEngine, GameResult};
pub use turn_engine::TurnEngine;
