//! The command surface of a game.
//!
//! `GameEngine` exposes every command a player (or the session layer) can
//! issue. Commands take the game as `&mut Game`; an engine holds only the
//! collaborators (dictionary, best-play search, notification channel).
//!
//! ## Implementation Notes
//!
//! - Validation happens before the first write: an `Err` leaves the game
//!   untouched
//! - Gameplay outcomes (rejected words, lost challenges) are `Ok` and show
//!   up as turns and notifications
//! - Undo and replay are built on this trait, see [`history`](crate::history)

use std::sync::Arc;

use crate::core::{Game, GameError, GameState, Move, PlayerKey, TurnType, WordScore};
use crate::lexicon::Lexicon;
use crate::notify::{Audience, Notification};
use crate::tiles::Tile;

/// Outcome of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerKey),
    /// Every player tied.
    Draw,
    /// Several players share the top score.
    Winners(Vec<PlayerKey>),
}

impl GameResult {
    /// Result of a game, or `None` while it is still running.
    #[must_use]
    pub fn of(game: &Game) -> Option<Self> {
        if !game.state.is_finished() {
            return None;
        }
        let top = game.players.iter().map(|p| p.score).max()?;
        let leaders: Vec<PlayerKey> = game
            .players
            .iter()
            .filter(|p| p.score == top)
            .map(|p| p.key.clone())
            .collect();
        Some(match leaders.len() {
            1 => Self::Winner(leaders[0].clone()),
            n if n == game.players.len() => Self::Draw,
            _ => Self::Winners(leaders),
        })
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: &PlayerKey) -> bool {
        match self {
            GameResult::Winner(p) => p == player,
            GameResult::Winners(ps) => ps.contains(player),
            GameResult::Draw => false,
        }
    }
}

/// Every command that can be applied to a game.
pub trait GameEngine {
    /// The dictionary in use, if any.
    fn lexicon(&self) -> Option<&Arc<Lexicon>>;

    /// Send a notification.
    fn notify(&self, audience: Audience, notification: Notification);

    /// Place tiles on the board.
    ///
    /// Under reject-on-submit word checking, a human play with unknown
    /// words is bounced back to the player with a `Reject` and nothing
    /// changes.
    fn play(&self, game: &mut Game, player: &PlayerKey, mv: &Move) -> Result<(), GameError>;

    /// Miss a turn. `turn_type` is `Passed` or `TimedOut`.
    fn pass(&self, game: &mut Game, player: &PlayerKey, turn_type: TurnType) -> Result<(), GameError>;

    /// Exchange tiles with the bag. Counts as a pass.
    fn swap(&self, game: &mut Game, player: &PlayerKey, tiles: &[Tile]) -> Result<(), GameError>;

    /// Check the words of the previous play.
    fn challenge(
        &self,
        game: &mut Game,
        challenger: &PlayerKey,
        challenged: &PlayerKey,
    ) -> Result<(), GameError>;

    /// Apply the penalty for a failed challenge.
    fn penalise_challenge(
        &self,
        game: &mut Game,
        challenger: &PlayerKey,
        challenged: &PlayerKey,
    ) -> Result<(), GameError>;

    /// Reverse the previous play. `turn_type` is `TookBack` (the player
    /// withdrew it) or `ChallengeWon` (`player` challenged it).
    fn take_back(&self, game: &mut Game, player: &PlayerKey, turn_type: TurnType) -> Result<(), GameError>;

    /// Finish the game, settling rack and clock penalties. Does nothing
    /// unless the game is being played.
    fn confirm_game_over(
        &self,
        game: &mut Game,
        player: &PlayerKey,
        end_state: GameState,
    ) -> Result<(), GameError>;

    fn pause(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError>;

    fn unpause(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError>;

    /// Create a follow-on game with the same configuration and players.
    fn another_game(&self, game: &mut Game) -> Result<Game, GameError>;

    /// Tell `player` about a better play than one worth `their_score`.
    fn advise(&self, game: &Game, player: &PlayerKey, their_score: i32) -> Result<(), GameError>;

    /// Suggest a play to `player`.
    fn hint(&self, game: &Game, player: &PlayerKey) -> Result<(), GameError>;

    fn toggle_advice(&self, game: &mut Game, player: &PlayerKey) -> Result<(), GameError>;

    /// Add a word to the dictionary's whitelist.
    fn allow(&self, game: &Game, player: &PlayerKey, word: &str) -> Result<(), GameError>;

    // === Convenience Methods ===

    /// Tell everyone who is in the game and who is connected.
    fn notify_connections(&self, game: &Game, connected: &[PlayerKey]) {
        let summaries = game
            .players
            .iter()
            .map(|p| crate::notify::PlayerSummary {
                key: p.key.clone(),
                name: p.name.clone(),
                score: p.score,
                is_robot: p.is_robot,
                is_next_to_go: game.whos_turn_key.as_ref() == Some(&p.key),
                connected: p.is_robot || connected.contains(&p.key),
            })
            .collect();
        self.notify(Audience::All, Notification::Connections(summaries));
    }

    /// Words of a move the dictionary does not know. Empty without a
    /// dictionary.
    fn unknown_words(&self, words: &[WordScore]) -> Vec<String> {
        match self.lexicon() {
            Some(lexicon) => words
                .iter()
                .filter(|w| !lexicon.has_word(&w.word))
                .map(|w| w.word.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// The result, once the game is over.
    fn result(&self, game: &Game) -> Option<GameResult> {
        GameResult::of(game)
    }
}
