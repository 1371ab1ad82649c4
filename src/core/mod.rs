//! Core game types: players, turns, state, configuration, RNG, errors.
//!
//! These are plain data. Commands that change a [`Game`] live in
//! [`rules`](crate::rules).

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;
pub mod turn;

pub use config::{ChallengePenalty, Edition, GameConfig, LetterSpec, TimerType, WordCheck};
pub use error::GameError;
pub use player::{Player, PlayerKey};
pub use rng::{GameRng, GameRngState};
pub use state::{Game, GameKey, GameState};
pub use turn::{Move, ScoreDelta, Turn, TurnType, WordScore};
