//! Replaying a finished game turn by turn.
//!
//! The source game is wound back to its start with [`Undo`], then each
//! recorded turn is fed back through the engine's own commands. The bag is
//! made predictable and stacked before every draw, so the replayed game
//! draws exactly the tiles the original did.

use tracing::debug;

use super::undo::Undo;
use crate::core::{Game, GameError, GameState, Move, Turn, TurnType, WordCheck};
use crate::rules::GameEngine;
use crate::tiles::Tile;

/// Steps through the turns of a recorded game.
pub struct Replay<'e, E: GameEngine> {
    engine: &'e E,
    source: Vec<Turn>,
    game: Game,
    next: usize,
}

impl<'e, E: GameEngine> Replay<'e, E> {
    /// Wind `source` back to its first turn. Every undo is notified on the
    /// engine's channel, so pass an engine with a quiet channel unless the
    /// notifications are wanted.
    pub fn new(engine: &'e E, source: &Game) -> Result<Self, GameError> {
        let mut game = source.clone();
        game.config.word_check = WordCheck::None;
        game.paused_by = None;
        while game.last_turn().is_some() {
            engine.undo(&mut game)?;
        }
        if !source.turns.is_empty() {
            game.state = GameState::Playing;
        }
        game.letter_bag.set_predictable(true);
        debug!(game = %game.key, turns = source.turns.len(), "replay ready");

        Ok(Self {
            engine,
            source: source.turns.iter().cloned().collect(),
            game,
            next: 0,
        })
    }

    /// The game as replayed so far.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.next >= self.source.len()
    }

    /// Number of turns left to replay.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.source.len() - self.next
    }

    fn stack(&mut self, tiles: &[Tile]) -> Result<(), GameError> {
        self.game
            .letter_bag
            .stack(tiles)
            .map_err(|tile| GameError::TileNotInBag { letter: tile.bag_letter() })
    }

    /// Replay the next turn. Returns the turn the engine recorded for it,
    /// or `None` once every turn has been replayed.
    pub fn step(&mut self) -> Result<Option<Turn>, GameError> {
        let Some(turn) = self.source.get(self.next).cloned() else {
            return Ok(None);
        };
        let player = &turn.player_key;
        let challenger = || {
            turn.challenger_key
                .clone()
                .ok_or(GameError::IncompleteTurn("challenger"))
        };
        debug!(game = %self.game.key, step = self.next, turn = %turn.turn_type, "replaying");

        match turn.turn_type {
            TurnType::Played => {
                self.stack(&turn.replacements)?;
                let mv = Move {
                    words: turn.words.clone(),
                    placements: turn.placements.iter().cloned().collect(),
                    replacements: turn.replacements.clone(),
                    score: turn.score,
                };
                self.engine.play(&mut self.game, player, &mv)?;
            }
            TurnType::Swapped => {
                self.stack(&turn.replacements)?;
                self.engine.swap(&mut self.game, player, &turn.placements)?;
            }
            TurnType::Passed | TurnType::TimedOut => {
                self.engine.pass(&mut self.game, player, turn.turn_type)?;
            }
            TurnType::TookBack => {
                self.engine.take_back(&mut self.game, player, TurnType::TookBack)?;
            }
            TurnType::ChallengeWon => {
                self.engine
                    .take_back(&mut self.game, &challenger()?, TurnType::ChallengeWon)?;
            }
            TurnType::ChallengeLost => {
                self.engine
                    .penalise_challenge(&mut self.game, &challenger()?, player)?;
            }
            TurnType::GameEnded => {
                let end_state = turn.end_state.unwrap_or(GameState::GameOver);
                self.engine.confirm_game_over(&mut self.game, player, end_state)?;
            }
        }

        self.next += 1;
        Ok(self.game.last_turn().cloned())
    }

    /// Replay every remaining turn and hand back the finished game.
    pub fn run(mut self) -> Result<Game, GameError> {
        while self.step()?.is_some() {}
        Ok(self.game)
    }
}
