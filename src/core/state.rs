//! The game aggregate.
//!
//! ## Game
//!
//! Everything one game owns:
//! - Board, letter bag and seated players
//! - Turn history
//! - Whose turn it is, lifecycle state and pause status
//!
//! The game holds state only. Commands live in
//! [`TurnEngine`](crate::rules::TurnEngine), which mutates a `&mut Game`.
//! Callers serialize commands per game; there is no internal locking.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{GameConfig, TimerType};
use super::error::GameError;
use super::player::{Player, PlayerKey};
use super::rng::GameRng;
use super::turn::Turn;
use crate::tiles::{Board, LetterBag, Tile};

/// Opaque game identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameKey(pub String);

impl GameKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state. Every state after `Playing` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Waiting,
    Playing,
    GameOver,
    TwoPasses,
    FailedChallenge,
    TimedOut,
}

impl GameState {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Waiting | Self::Playing)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Waiting => "Waiting for players",
            Self::Playing => "Playing",
            Self::GameOver => "Game over",
            Self::TwoPasses => "All players passed twice",
            Self::FailedChallenge => "Challenge failed",
            Self::TimedOut => "Timed out",
        })
    }
}

/// A single game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub key: GameKey,
    pub config: GameConfig,
    pub board: Board,
    pub letter_bag: LetterBag,

    /// Seated players, in turn order.
    pub players: Vec<Player>,

    /// Turn history. Persistent vector, so snapshots clone cheaply.
    pub turns: Vector<Turn>,

    pub whos_turn_key: Option<PlayerKey>,
    pub state: GameState,

    /// Name of the player who paused the game.
    pub paused_by: Option<String>,

    /// Follow-on game, once one has been created.
    pub next_game_key: Option<GameKey>,

    /// Milliseconds since the epoch.
    pub creation_timestamp: i64,

    /// When the current player's clock started, if it is running.
    clock_started_at: Option<i64>,

    rng: GameRng,
}

impl Game {
    /// Create an empty game in the `Waiting` state.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let key = GameKey::new(rng.gen_key());
        let mut letter_bag = LetterBag::from_edition(&config.edition, rng.next_seed());
        letter_bag.set_predictable(config.predictable_bag);
        let board = Board::new(config.edition.rows, config.edition.cols);

        Self {
            key,
            config,
            board,
            letter_bag,
            players: Vec::new(),
            turns: Vector::new(),
            whos_turn_key: None,
            state: GameState::Waiting,
            paused_by: None,
            next_game_key: None,
            creation_timestamp: chrono::Utc::now().timestamp_millis(),
            clock_started_at: None,
            rng,
        }
    }

    /// Seed for a follow-on game.
    pub fn derive_seed(&mut self) -> u64 {
        self.rng.next_seed()
    }

    // === Players ===

    /// Seat a player. With `fill_rack`, their rack is filled from the bag.
    pub fn add_player(&mut self, mut player: Player, fill_rack: bool) -> Result<(), GameError> {
        if self.config.max_players.is_some_and(|max| self.players.len() >= max) {
            return Err(GameError::GameFull);
        }
        if fill_rack {
            let wanted = player.rack.capacity().saturating_sub(player.rack.len());
            for tile in self.letter_bag.draw_many(wanted) {
                player.rack.add_tile(&tile);
            }
        }
        if self.config.timer == TimerType::Game {
            player.clock = Some(self.config.time_allowed);
        }
        debug!(game = %self.key, player = %player.key, "seated player");
        self.players.push(player);
        Ok(())
    }

    #[must_use]
    pub fn player(&self, key: &PlayerKey) -> Option<&Player> {
        self.players.iter().find(|p| &p.key == key)
    }

    pub fn player_mut(&mut self, key: &PlayerKey) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.key == key)
    }

    /// Index of a player in turn order.
    pub fn player_index(&self, key: &PlayerKey) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| &p.key == key)
            .ok_or_else(|| GameError::UnknownPlayer(key.clone()))
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.whos_turn_key.as_ref().and_then(|key| self.player(key))
    }

    /// Fail unless it is `key`'s turn.
    pub fn assert_turn(&self, key: &PlayerKey) -> Result<(), GameError> {
        if self.whos_turn_key.as_ref() == Some(key) {
            Ok(())
        } else {
            Err(GameError::NotYourTurn { player: key.clone() })
        }
    }

    /// Work out who moves after the current player.
    ///
    /// A player flagged to miss their next turn is skipped, and the flag
    /// is cleared.
    pub fn next_player(&mut self) -> Option<PlayerKey> {
        let current = self.whos_turn_key.as_ref()?;
        let len = self.players.len();
        let index = self.players.iter().position(|p| &p.key == current)?;
        let mut next = (index + 1) % len;
        if self.players[next].miss_next_turn {
            self.players[next].miss_next_turn = false;
            debug!(game = %self.key, player = %self.players[next].key, "skipping turn");
            next = (next + 1) % len;
        }
        Some(self.players[next].key.clone())
    }

    /// Whether every player has passed (or swapped) twice in a row.
    #[must_use]
    pub fn all_passed_twice(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.passes >= 2)
    }

    // === Turns ===

    #[must_use]
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append a turn to the history.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push_back(turn);
    }

    /// Hand the turn to `key`. `remaining` restores a clock that was
    /// interrupted; otherwise a turn timer starts afresh.
    pub fn start_turn(&mut self, key: PlayerKey, remaining: Option<i64>) {
        let timer = self.config.timer;
        let allowed = self.config.time_allowed;
        if let Some(player) = self.player_mut(&key) {
            match (timer, remaining) {
                (TimerType::None, _) => {}
                (TimerType::Turn, None) => player.clock = Some(allowed),
                (_, Some(left)) => player.clock = Some(left),
                (TimerType::Game, None) => {}
            }
        }
        self.whos_turn_key = Some(key);
        self.start_clock();
    }

    /// Start the current player's clock, if the game is timed.
    pub fn start_clock(&mut self) {
        if self.config.timer != TimerType::None && self.state == GameState::Playing {
            self.clock_started_at = Some(chrono::Utc::now().timestamp_millis());
        }
    }

    /// Stop the running clock, charging elapsed time to the current player.
    pub fn stop_clock(&mut self) {
        let Some(started) = self.clock_started_at.take() else {
            return;
        };
        let elapsed = (chrono::Utc::now().timestamp_millis() - started) / 1000;
        if let Some(key) = self.whos_turn_key.clone() {
            if let Some(clock) = self.player_mut(&key).and_then(|p| p.clock.as_mut()) {
                *clock -= elapsed;
            }
        }
    }

    #[must_use]
    pub fn is_clock_running(&self) -> bool {
        self.clock_started_at.is_some()
    }

    // === Lifecycle ===

    /// Start play once enough players are seated. Returns whether the game
    /// is now being played.
    pub fn play_if_ready(&mut self) -> bool {
        if self.state != GameState::Waiting {
            return self.state == GameState::Playing;
        }
        if self.players.len() < self.config.min_players.max(1) {
            return false;
        }
        self.state = GameState::Playing;
        let first = self.players[0].key.clone();
        debug!(game = %self.key, first = %first, "game ready");
        self.start_turn(first, None);
        true
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_by.is_some()
    }

    /// Time out a game nobody has touched for `limit_ms` milliseconds.
    /// Returns whether the game timed out.
    pub fn check_age(&mut self, limit_ms: i64) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let last_activity = self
            .last_turn()
            .map_or(self.creation_timestamp, |turn| turn.timestamp);
        if chrono::Utc::now().timestamp_millis() - last_activity > limit_ms {
            self.stop_clock();
            self.state = GameState::TimedOut;
            debug!(game = %self.key, "game timed out");
            return true;
        }
        false
    }

    // === Tile movement ===

    /// Check that `player` holds every tile in `placements` and that all
    /// squares are free and distinct.
    pub fn validate_placements(&self, player: usize, placements: &[Tile]) -> Result<(), GameError> {
        if placements.is_empty() {
            return Err(GameError::NoPlacements);
        }
        let mut seen = Vec::with_capacity(placements.len());
        for tile in placements {
            let at = tile.position.ok_or(GameError::UnplacedTile)?;
            if !self.board.is_free(at) || seen.contains(&at) {
                return Err(GameError::BadSquare { row: at.row, col: at.col });
            }
            seen.push(at);
        }
        match self.players[player].rack.find_missing(placements) {
            Some(tile) => Err(GameError::TileNotOnRack { letter: tile.bag_letter() }),
            None => Ok(()),
        }
    }

    /// Move tiles from a rack to the board. Call `validate_placements` first.
    pub fn rack_to_board(&mut self, player: usize, placements: &[Tile]) {
        for tile in placements {
            if self.players[player].rack.remove_tile(tile).is_some() {
                self.board.place(tile.clone());
            }
        }
    }

    /// Lift tiles off the board back onto a rack.
    pub fn board_to_rack(&mut self, player: usize, placements: &[Tile]) {
        for tile in placements {
            if let Some(at) = tile.position {
                if let Some(lifted) = self.board.take(at) {
                    self.players[player].rack.add_tile(&lifted);
                }
            }
        }
    }

    /// Return tiles from a rack to the bag.
    pub fn rack_to_bag(&mut self, player: usize, tiles: &[Tile]) {
        for tile in tiles {
            if let Some(removed) = self.players[player].rack.remove_tile(tile) {
                self.letter_bag.return_tile(&removed);
            }
        }
    }

    /// Pull specific tiles out of the bag onto a rack.
    pub fn bag_to_rack(&mut self, player: usize, tiles: &[Tile]) {
        for tile in tiles {
            if let Some(drawn) = self.letter_bag.remove_tile(tile) {
                self.players[player].rack.add_tile(&drawn);
            }
        }
    }
}
