//! Commands arriving from clients, and their dispatch.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::GameEngine;
use crate::core::{Game, GameError, GameState, Move, PlayerKey, Turn, TurnType};
use crate::history::Undo;
use crate::tiles::Tile;

/// Wire tag of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandTag {
    Challenge,
    ConfirmGameOver,
    Pass,
    Pause,
    Play,
    Redo,
    Swap,
    TakeBack,
    Undo,
    Unpause,
}

impl CommandTag {
    pub const ALL: [CommandTag; 10] = [
        Self::Challenge,
        Self::ConfirmGameOver,
        Self::Pass,
        Self::Pause,
        Self::Play,
        Self::Redo,
        Self::Swap,
        Self::TakeBack,
        Self::Undo,
        Self::Unpause,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Challenge => "CHALLENGE",
            Self::ConfirmGameOver => "CONFIRM_GAME_OVER",
            Self::Pass => "PASS",
            Self::Pause => "PAUSE",
            Self::Play => "PLAY",
            Self::Redo => "REDO",
            Self::Swap => "SWAP",
            Self::TakeBack => "TAKE_BACK",
            Self::Undo => "UNDO",
            Self::Unpause => "UNPAUSE",
        }
    }
}

impl std::fmt::Display for CommandTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandTag {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| GameError::UnknownCommand(s.to_owned()))
    }
}

/// A command with its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Challenge { challenged: PlayerKey },
    ConfirmGameOver,
    Pass,
    Pause,
    Play(Move),
    Redo(Turn),
    Swap(Vec<Tile>),
    TakeBack,
    Undo,
    Unpause,
}

impl Command {
    #[must_use]
    pub const fn tag(&self) -> CommandTag {
        match self {
            Self::Challenge { .. } => CommandTag::Challenge,
            Self::ConfirmGameOver => CommandTag::ConfirmGameOver,
            Self::Pass => CommandTag::Pass,
            Self::Pause => CommandTag::Pause,
            Self::Play(_) => CommandTag::Play,
            Self::Redo(_) => CommandTag::Redo,
            Self::Swap(_) => CommandTag::Swap,
            Self::TakeBack => CommandTag::TakeBack,
            Self::Undo => CommandTag::Undo,
            Self::Unpause => CommandTag::Unpause,
        }
    }
}

/// Apply a command issued by `player`.
pub fn dispatch<E: GameEngine>(
    engine: &E,
    game: &mut Game,
    player: &PlayerKey,
    command: Command,
) -> Result<(), GameError> {
    debug!(game = %game.key, player = %player, command = %command.tag(), "command");
    match command {
        Command::Challenge { challenged } => engine.challenge(game, player, &challenged),
        Command::ConfirmGameOver => engine.confirm_game_over(game, player, GameState::GameOver),
        Command::Pass => engine.pass(game, player, TurnType::Passed),
        Command::Pause => engine.pause(game, player),
        Command::Play(mv) => engine.play(game, player, &mv),
        Command::Redo(turn) => engine.redo(game, turn),
        Command::Swap(tiles) => engine.swap(game, player, &tiles),
        Command::TakeBack => engine.take_back(game, player, TurnType::TookBack),
        Command::Undo => engine.undo(game).map(|_| ()),
        Command::Unpause => engine.unpause(game, player),
    }
}
