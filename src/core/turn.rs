//! Moves and turn records.
//!
//! A `Move` is what a client submits for a play. A `Turn` is the record
//! of one resolved action, appended to the game history. History is
//! append-only during play: a take-back or successful challenge appends
//! an inverse turn rather than removing the original.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::ChallengePenalty;
use super::player::PlayerKey;
use super::state::{GameKey, GameState};
use crate::tiles::Tile;

/// Kind of a recorded turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnType {
    Played,
    Swapped,
    Passed,
    TimedOut,
    TookBack,
    ChallengeWon,
    ChallengeLost,
    GameEnded,
}

impl TurnType {
    /// Wire name of the turn type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Played => "play",
            Self::Swapped => "swap",
            Self::Passed => "pass",
            Self::TimedOut => "timeout",
            Self::TookBack => "took-back",
            Self::ChallengeWon => "challenge-won",
            Self::ChallengeLost => "challenge-lost",
            Self::GameEnded => "game-over",
        }
    }
}

impl std::fmt::Display for TurnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A word formed by a move and the points it scored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordScore {
    pub word: String,
    pub score: i32,
}

impl WordScore {
    pub fn new(word: impl Into<String>, score: i32) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// A play submitted by a client.
///
/// Placements carry their board positions. The engine trusts the client's
/// word list and score; only word validity is ever checked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub words: Vec<WordScore>,
    pub placements: SmallVec<[Tile; 8]>,
    /// Tiles the client expects to draw. Carried on the wire, never read.
    #[serde(default)]
    pub replacements: Vec<Tile>,
    pub score: i32,
}

impl Move {
    /// Create a move from its placements and total score.
    #[must_use]
    pub fn new(placements: &[Tile], score: i32) -> Self {
        Self {
            words: Vec::new(),
            placements: placements.iter().cloned().collect(),
            replacements: Vec::new(),
            score,
        }
    }

    /// Add a word formed by the move.
    #[must_use]
    pub fn with_word(mut self, word: impl Into<String>, score: i32) -> Self {
        self.words.push(WordScore::new(word, score));
        self
    }

    /// The words formed, without scores.
    pub fn word_list(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.word.as_str())
    }
}

/// Per-player score change recorded when a game ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub key: PlayerKey,
    /// Points gained or lost for tiles left on racks.
    pub tiles: i32,
    /// Points lost for running over the game clock.
    pub time: Option<i32>,
    /// Letters left on the rack, comma separated.
    pub tiles_remaining: Option<String>,
}

/// Record of one resolved player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub turn_type: TurnType,
    pub game_key: GameKey,

    /// The player the turn is about. For challenge outcomes, the player
    /// whose play was challenged.
    pub player_key: PlayerKey,

    /// Who moves next, if the turn passes control.
    pub next_to_go_key: Option<PlayerKey>,

    /// Change to `player_key`'s score (or the challenger's, for a lost
    /// challenge). Unused for `GameEnded`, which carries `deltas`.
    pub score: i32,

    pub deltas: Vec<ScoreDelta>,

    /// Tiles placed (play), discarded (swap) or lifted (take-back).
    pub placements: Vec<Tile>,

    /// Tiles drawn from the bag.
    pub replacements: Vec<Tile>,

    pub words: Vec<WordScore>,
    pub challenger_key: Option<PlayerKey>,
    pub end_state: Option<GameState>,
    pub penalty: Option<ChallengePenalty>,

    /// The player's pass count before a play reset it.
    pub passes: u32,

    /// Seconds left on the mover's clock when control returns to them.
    pub remaining_time: Option<i64>,

    /// Milliseconds since the epoch.
    pub timestamp: i64,
}

impl Turn {
    /// Create a turn record with empty payload, stamped now.
    #[must_use]
    pub fn new(turn_type: TurnType, game_key: GameKey, player_key: PlayerKey) -> Self {
        Self {
            turn_type,
            game_key,
            player_key,
            next_to_go_key: None,
            score: 0,
            deltas: Vec::new(),
            placements: Vec::new(),
            replacements: Vec::new(),
            words: Vec::new(),
            challenger_key: None,
            end_state: None,
            penalty: None,
            passes: 0,
            remaining_time: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    #[must_use]
    pub fn with_next_to_go(mut self, key: Option<PlayerKey>) -> Self {
        self.next_to_go_key = key;
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    #[must_use]
    pub fn with_placements(mut self, tiles: impl IntoIterator<Item = Tile>) -> Self {
        self.placements = tiles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_replacements(mut self, tiles: impl IntoIterator<Item = Tile>) -> Self {
        self.replacements = tiles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_words(mut self, words: Vec<WordScore>) -> Self {
        self.words = words;
        self
    }

    #[must_use]
    pub fn with_challenger(mut self, key: PlayerKey) -> Self {
        self.challenger_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_penalty(mut self, penalty: ChallengePenalty) -> Self {
        self.penalty = Some(penalty);
        self
    }

    /// Total score of the words in the turn.
    #[must_use]
    pub fn words_score(&self) -> i32 {
        self.words.iter().map(|w| w.score).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_type_names() {
        assert_eq!(TurnType::Played.to_string(), "play");
        assert_eq!(TurnType::ChallengeWon.to_string(), "challenge-won");
        assert_eq!(TurnType::GameEnded.to_string(), "game-over");
    }

    #[test]
    fn test_move_builder() {
        let mv = Move::new(&[Tile::new('A', 1).at(7, 7), Tile::new('T', 1).at(7, 8)], 4)
            .with_word("AT", 4);

        assert_eq!(mv.placements.len(), 2);
        assert_eq!(mv.word_list().collect::<Vec<_>>(), vec!["AT"]);
    }

    #[test]
    fn test_move_replacements_are_optional() {
        let mv = Move::new(&[Tile::new('A', 1).at(7, 7)], 1).with_word("A", 1);
        let mut json: serde_json::Value = serde_json::to_value(&mv).unwrap();
        assert_eq!(json["replacements"], serde_json::json!([]));

        json.as_object_mut().unwrap().remove("replacements");
        let parsed: Move = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, mv);
    }

    #[test]
    fn test_turn_builder() {
        let turn = Turn::new(TurnType::ChallengeLost, GameKey::new("g"), PlayerKey::new("p1"))
            .with_score(-5)
            .with_challenger(PlayerKey::new("p2"))
            .with_penalty(ChallengePenalty::PerTurn)
            .with_next_to_go(Some(PlayerKey::new("p2")));

        assert_eq!(turn.score, -5);
        assert_eq!(turn.challenger_key, Some(PlayerKey::new("p2")));
        assert_eq!(turn.penalty, Some(ChallengePenalty::PerTurn));
        assert!(turn.timestamp > 0);
    }

    #[test]
    fn test_words_score() {
        let turn = Turn::new(TurnType::Played, GameKey::new("g"), PlayerKey::new("p1"))
            .with_words(vec![WordScore::new("SINK", 8), WordScore::new("AS", 2)]);
        assert_eq!(turn.words_score(), 10);
    }
}
