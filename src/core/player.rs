//! Player identification and per-player state.
//!
//! ## PlayerKey
//!
//! Players are identified by an opaque string key handed out by the
//! session layer. The engine only compares keys.
//!
//! ## Player
//!
//! Owned by the [`Game`](crate::core::Game) and mutated exclusively by
//! the turn engine.

use serde::{Deserialize, Serialize};

use crate::tiles::Rack;

/// Opaque player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey(pub String);

impl PlayerKey {
    /// Create a new player key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player seated in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique key.
    pub key: PlayerKey,

    /// Display name.
    pub name: String,

    /// Tiles the player can draw on.
    pub rack: Rack,

    /// Running score. Signed: penalties can take it below zero.
    pub score: i32,

    /// Consecutive passes (swaps count too). Reset by a play.
    pub passes: u32,

    /// Set by a failed challenge under the miss-a-turn penalty.
    pub miss_next_turn: bool,

    /// Seconds left on the chess clock when the game timer is in use.
    /// Goes negative when the player runs over.
    pub clock: Option<i64>,

    /// Robots bypass word checking.
    pub is_robot: bool,

    /// Whether a robot issues challenges.
    pub can_challenge: bool,

    /// Wants post-play advice from the best-play search.
    pub wants_advice: bool,
}

impl Player {
    /// Create a human player with an empty rack.
    pub fn new(key: impl Into<String>, name: impl Into<String>, rack_size: usize) -> Self {
        Self {
            key: PlayerKey::new(key),
            name: name.into(),
            rack: Rack::new(rack_size),
            score: 0,
            passes: 0,
            miss_next_turn: false,
            clock: None,
            is_robot: false,
            can_challenge: false,
            wants_advice: false,
        }
    }

    /// Mark this player as a robot.
    #[must_use]
    pub fn robot(mut self) -> Self {
        self.is_robot = true;
        self
    }

    /// Enable post-play advice.
    #[must_use]
    pub fn with_advice(mut self) -> Self {
        self.wants_advice = true;
        self
    }

    /// A copy of this player for a follow-on game: same identity and
    /// preferences, fresh rack, score and clock.
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self {
            key: self.key.clone(),
            name: self.name.clone(),
            rack: Rack::new(self.rack.capacity()),
            score: 0,
            passes: 0,
            miss_next_turn: false,
            clock: None,
            is_robot: self.is_robot,
            can_challenge: self.can_challenge,
            wants_advice: self.wants_advice,
        }
    }

    /// Flip the advice preference.
    pub fn toggle_advice(&mut self) {
        self.wants_advice = !self.wants_advice;
    }
}
