//! Undo and redo of recorded turns.
//!
//! Undo pops the last turn and reverses its effect on the board, racks,
//! bag and scores. Redo applies a turn record as it stands, without
//! re-validating the move; it is the inverse of undo.

use tracing::debug;

use crate::core::{ChallengePenalty, Game, GameError, GameState, Turn, TurnType};
use crate::notify::{Audience, Notification};
use crate::rules::GameEngine;

/// Undo and redo, available on every [`GameEngine`].
pub trait Undo {
    /// Reverse the last turn and remove it from the history. Returns the
    /// removed turn.
    fn undo(&self, game: &mut Game) -> Result<Turn, GameError>;

    /// Re-apply a turn previously removed by [`undo`](Self::undo).
    fn redo(&self, game: &mut Game, turn: Turn) -> Result<(), GameError>;
}

fn challenger_index(game: &Game, turn: &Turn) -> Result<usize, GameError> {
    let key = turn
        .challenger_key
        .as_ref()
        .ok_or(GameError::IncompleteTurn("challenger"))?;
    game.player_index(key)
}

/// The player passed over when `mover` handed the turn on, if any.
fn skipped_player(game: &Game, mover: usize, turn: &Turn) -> Option<usize> {
    let len = game.players.len();
    let next = turn.next_to_go_key.as_ref()?;
    let after = (mover + 1) % len;
    (len > 2 && &game.players[(after + 1) % len].key == next).then_some(after)
}

/// Set or clear the miss-turn flag of whoever `turn` skipped.
fn mark_skipped(game: &mut Game, mover: usize, turn: &Turn, miss: bool) {
    if let Some(skipped) = skipped_player(game, mover, turn) {
        game.players[skipped].miss_next_turn = miss;
    }
}

impl<E: GameEngine> Undo for E {
    fn undo(&self, game: &mut Game) -> Result<Turn, GameError> {
        let turn = game.last_turn().cloned().ok_or(GameError::NothingToUndo)?;
        let index = game.player_index(&turn.player_key)?;
        debug!(game = %game.key, turn = %turn.turn_type, player = %turn.player_key, "undo");

        match turn.turn_type {
            TurnType::Played => {
                if let Some(tile) = game.players[index].rack.find_missing(&turn.replacements) {
                    return Err(GameError::TileNotOnRack { letter: tile.bag_letter() });
                }
                game.stop_clock();
                game.rack_to_bag(index, &turn.replacements);
                game.board_to_rack(index, &turn.placements);
                mark_skipped(game, index, &turn, true);
                let player = &mut game.players[index];
                player.score -= turn.score;
                player.passes = turn.passes;
                game.start_turn(turn.player_key.clone(), turn.remaining_time);
            }
            TurnType::Swapped => {
                game.stop_clock();
                game.rack_to_bag(index, &turn.replacements);
                game.bag_to_rack(index, &turn.placements);
                mark_skipped(game, index, &turn, true);
                let player = &mut game.players[index];
                player.passes = player.passes.saturating_sub(1);
                game.start_turn(turn.player_key.clone(), None);
            }
            TurnType::Passed | TurnType::TimedOut => {
                game.stop_clock();
                mark_skipped(game, index, &turn, true);
                let player = &mut game.players[index];
                player.passes = player.passes.saturating_sub(1);
                game.start_turn(turn.player_key.clone(), None);
            }
            TurnType::TookBack | TurnType::ChallengeWon => {
                game.validate_placements(index, &turn.placements)?;
                game.stop_clock();
                game.bag_to_rack(index, &turn.replacements);
                game.rack_to_board(index, &turn.placements);
                game.players[index].score -= turn.score;
                if turn.turn_type == TurnType::TookBack {
                    // Back to whoever was to move after the play.
                    let before = game.turns.len().checked_sub(2).and_then(|i| game.turns.get(i));
                    if let Some(next) = before.and_then(|t| t.next_to_go_key.clone()) {
                        game.start_turn(next, None);
                    }
                } else {
                    game.start_clock();
                }
            }
            TurnType::ChallengeLost => {
                let challenger = challenger_index(game, &turn)?;
                game.stop_clock();
                if turn.penalty == Some(ChallengePenalty::MissTurn) {
                    mark_skipped(game, challenger, &turn, true);
                    let key = game.players[challenger].key.clone();
                    game.start_turn(key, None);
                } else {
                    if game.config.challenge_penalty == ChallengePenalty::MissTurn {
                        game.players[challenger].miss_next_turn = false;
                    } else {
                        game.players[challenger].score -= turn.score;
                    }
                    game.start_clock();
                }
            }
            TurnType::GameEnded => {
                for delta in &turn.deltas {
                    if let Some(player) = game.player_mut(&delta.key) {
                        player.score -= delta.tiles + delta.time.unwrap_or(0);
                    }
                }
                game.state = GameState::Playing;
                game.start_clock();
            }
        }

        game.turns.pop_back();
        self.notify(Audience::All, Notification::Undone(turn.clone()));
        Ok(turn)
    }

    fn redo(&self, game: &mut Game, turn: Turn) -> Result<(), GameError> {
        let index = game.player_index(&turn.player_key)?;
        debug!(game = %game.key, turn = %turn.turn_type, player = %turn.player_key, "redo");

        match turn.turn_type {
            TurnType::Played => {
                game.validate_placements(index, &turn.placements)?;
                game.stop_clock();
                game.rack_to_board(index, &turn.placements);
                game.bag_to_rack(index, &turn.replacements);
                mark_skipped(game, index, &turn, false);
                let player = &mut game.players[index];
                player.score += turn.score;
                player.passes = 0;
            }
            TurnType::Swapped => {
                if let Some(tile) = game.players[index].rack.find_missing(&turn.placements) {
                    return Err(GameError::TileNotOnRack { letter: tile.bag_letter() });
                }
                game.stop_clock();
                game.rack_to_bag(index, &turn.placements);
                game.bag_to_rack(index, &turn.replacements);
                mark_skipped(game, index, &turn, false);
                game.players[index].passes += 1;
            }
            TurnType::Passed | TurnType::TimedOut => {
                game.stop_clock();
                mark_skipped(game, index, &turn, false);
                game.players[index].passes += 1;
            }
            TurnType::TookBack | TurnType::ChallengeWon => {
                game.stop_clock();
                game.rack_to_bag(index, &turn.replacements);
                game.board_to_rack(index, &turn.placements);
                game.players[index].score += turn.score;
            }
            TurnType::ChallengeLost => {
                let challenger = challenger_index(game, &turn)?;
                game.stop_clock();
                if turn.penalty == Some(ChallengePenalty::MissTurn) {
                    mark_skipped(game, challenger, &turn, false);
                } else if game.config.challenge_penalty == ChallengePenalty::MissTurn {
                    game.players[challenger].miss_next_turn = true;
                } else {
                    game.players[challenger].score += turn.score;
                }
            }
            TurnType::GameEnded => {
                game.stop_clock();
                for delta in &turn.deltas {
                    if let Some(player) = game.player_mut(&delta.key) {
                        player.score += delta.tiles + delta.time.unwrap_or(0);
                    }
                }
                game.state = turn.end_state.unwrap_or(GameState::GameOver);
            }
        }

        match turn.next_to_go_key.clone() {
            Some(next) => game.start_turn(next, None),
            None => game.start_clock(),
        }
        game.push_turn(turn.clone());
        self.notify(Audience::All, Notification::Turn(turn));
        Ok(())
    }
}
