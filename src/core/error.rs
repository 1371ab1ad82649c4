//! Error types for game commands.
//!
//! A `GameError` is a protocol or invariant violation: the caller asked
//! for something the rules never allow (acting out of turn, challenging
//! your own play, ...). Commands return it before touching any state.
//! Ordinary gameplay outcomes such as a rejected word or a lost challenge
//! are notifications and turn records, never errors.

use thiserror::Error;

use super::player::PlayerKey;
use super::turn::TurnType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Not {player}'s turn")]
    NotYourTurn { player: PlayerKey },
    #[error("No player with key {0}")]
    UnknownPlayer(PlayerKey),
    #[error("No placements")]
    NoPlacements,
    #[error("Game is paused by {0}")]
    Paused(String),
    #[error("Game is not being played")]
    NotPlaying,
    #[error("No previous move to take back")]
    NoPreviousMove,
    #[error("Cannot challenge a {0}")]
    CannotChallenge(TurnType),
    #[error("Cannot challenge your own play")]
    SelfChallenge,
    #[error("Last player challenge mismatch")]
    ChallengeMismatch,
    #[error("Cannot swap, bag only has {available} tiles")]
    BagTooSmall { requested: usize, available: usize },
    #[error("Cannot find {letter:?} on rack")]
    TileNotOnRack { letter: char },
    #[error("Cannot find {letter:?} in bag")]
    TileNotInBag { letter: char },
    #[error("Square {row},{col} is not usable")]
    BadSquare { row: usize, col: usize },
    #[error("Placement has no position")]
    UnplacedTile,
    #[error("Found more than one player with no tiles when finishing game")]
    MultipleEmptyRacks,
    #[error("Taking back plays is not allowed in this game")]
    TakeBackNotAllowed,
    #[error("Game is full")]
    GameFull,
    #[error("Next game already exists")]
    NextGameExists,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Turn record has no {0}")]
    IncompleteTurn(&'static str),
    #[error("unrecognized command: {0}")]
    UnknownCommand(String),
}
