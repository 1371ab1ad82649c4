//! Game configuration types.
//!
//! A game is configured once at creation by a `GameConfig`:
//! - `Edition`: board size, rack size and letter distribution
//! - word checking, challenge penalty and timer policies
//! - player limits and RNG seeding
//!
//! The engine never hardcodes any of these; a follow-on game copies the
//! configuration of its predecessor.

use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, BLANK};

/// One letter of an edition's distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterSpec {
    /// The letter, or [`BLANK`] for blanks.
    pub letter: char,
    /// Number of tiles in a full bag.
    pub count: usize,
    /// Face value.
    pub score: i32,
}

impl LetterSpec {
    #[must_use]
    pub const fn new(letter: char, count: usize, score: i32) -> Self {
        Self { letter, count, score }
    }

    /// A fresh tile of this letter.
    #[must_use]
    pub fn tile(&self) -> Tile {
        if self.letter == BLANK {
            Tile::blank()
        } else {
            Tile::new(self.letter, self.score)
        }
    }
}

/// Board, rack and bag layout of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub rack_size: usize,
    pub letters: Vec<LetterSpec>,
}

impl Edition {
    /// Create an edition with an empty letter distribution.
    pub fn new(name: impl Into<String>, rows: usize, cols: usize, rack_size: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            rack_size,
            letters: Vec::new(),
        }
    }

    /// Add a letter to the distribution.
    #[must_use]
    pub fn with_letter(mut self, letter: char, count: usize, score: i32) -> Self {
        self.letters.push(LetterSpec::new(letter, count, score));
        self
    }

    /// The classic English 15x15 edition: 100 tiles, 7-tile racks.
    #[must_use]
    pub fn english() -> Self {
        const LETTERS: [(char, usize, i32); 27] = [
            (BLANK, 2, 0),
            ('A', 9, 1),
            ('B', 2, 3),
            ('C', 2, 3),
            ('D', 4, 2),
            ('E', 12, 1),
            ('F', 2, 4),
            ('G', 3, 2),
            ('H', 2, 4),
            ('I', 9, 1),
            ('J', 1, 8),
            ('K', 1, 5),
            ('L', 4, 1),
            ('M', 2, 3),
            ('N', 6, 1),
            ('O', 8, 1),
            ('P', 2, 3),
            ('Q', 1, 10),
            ('R', 6, 1),
            ('S', 4, 1),
            ('T', 6, 1),
            ('U', 4, 1),
            ('V', 2, 4),
            ('W', 2, 4),
            ('X', 1, 8),
            ('Y', 2, 4),
            ('Z', 1, 10),
        ];
        LETTERS
            .iter()
            .fold(Self::new("English", 15, 15, 7), |edition, &(letter, count, score)| {
                edition.with_letter(letter, count, score)
            })
    }

    /// Face value of a letter, 0 for unknown letters and blanks.
    #[must_use]
    pub fn letter_score(&self, letter: char) -> i32 {
        self.letters
            .iter()
            .find(|spec| spec.letter == letter)
            .map_or(0, |spec| spec.score)
    }

    /// Tiles in a full bag.
    #[must_use]
    pub fn bag_size(&self) -> usize {
        self.letters.iter().map(|spec| spec.count).sum()
    }
}

/// When words in a play are checked against the dictionary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordCheck {
    /// Only challenges check words.
    #[default]
    None,
    /// Accept the play, then privately tell the player about unknown words.
    After,
    /// Refuse plays by humans that contain unknown words.
    Reject,
}

/// Cost of a failed challenge to the challenger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengePenalty {
    /// Challenger misses a turn.
    #[default]
    MissTurn,
    /// Challenger loses `penalty_points`.
    PerTurn,
    /// Challenger loses `penalty_points` for each word challenged.
    PerWord,
    /// No cost.
    None,
}

/// Game clock policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerType {
    #[default]
    None,
    /// Each turn is limited to `time_allowed` seconds.
    Turn,
    /// Chess clock: each player gets `time_allowed` seconds for the game.
    Game,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub edition: Edition,

    /// Dictionary name, resolved by a [`LexiconLibrary`](crate::lexicon::LexiconLibrary).
    pub dictionary: Option<String>,

    pub word_check: WordCheck,

    pub challenge_penalty: ChallengePenalty,

    /// Points lost under `PerTurn` and `PerWord` penalties.
    pub penalty_points: i32,

    pub timer: TimerType,

    /// Seconds per turn or per game, depending on `timer`.
    pub time_allowed: i64,

    /// Points lost per minute of overtime under the game timer.
    pub time_penalty: i32,

    pub min_players: usize,

    /// `None` for no limit.
    pub max_players: Option<usize>,

    pub allow_take_back: bool,

    /// Seed for the letter bag and generated keys.
    pub seed: u64,

    /// Draw tiles in a fixed order. Used by replays.
    pub predictable_bag: bool,
}

impl GameConfig {
    /// Create a configuration for an edition with default policies.
    #[must_use]
    pub fn new(edition: Edition) -> Self {
        Self {
            edition,
            dictionary: None,
            word_check: WordCheck::None,
            challenge_penalty: ChallengePenalty::MissTurn,
            penalty_points: 5,
            timer: TimerType::None,
            time_allowed: 0,
            time_penalty: 0,
            min_players: 2,
            max_players: None,
            allow_take_back: false,
            seed: 0,
            predictable_bag: false,
        }
    }

    #[must_use]
    pub fn with_dictionary(mut self, name: impl Into<String>) -> Self {
        self.dictionary = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_word_check(mut self, check: WordCheck) -> Self {
        self.word_check = check;
        self
    }

    /// Set the challenge penalty and the points it costs.
    #[must_use]
    pub fn with_challenge_penalty(mut self, penalty: ChallengePenalty, points: i32) -> Self {
        self.challenge_penalty = penalty;
        self.penalty_points = points;
        self
    }

    /// Set the timer. `time_allowed` is in seconds, `time_penalty` in
    /// points per minute of overtime.
    #[must_use]
    pub fn with_timer(mut self, timer: TimerType, time_allowed: i64, time_penalty: i32) -> Self {
        self.timer = timer;
        self.time_allowed = time_allowed;
        self.time_penalty = time_penalty;
        self
    }

    #[must_use]
    pub fn with_players(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    #[must_use]
    pub fn with_take_back(mut self, allow: bool) -> Self {
        self.allow_take_back = allow;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_predictable_bag(mut self, predictable: bool) -> Self {
        self.predictable_bag = predictable;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Edition::english())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_edition() {
        let edition = Edition::english();

        assert_eq!(edition.bag_size(), 100);
        assert_eq!(edition.rack_size, 7);
        assert_eq!(edition.letter_score('Q'), 10);
        assert_eq!(edition.letter_score(BLANK), 0);
        assert_eq!(edition.letter_score('?'), 0);
    }

    #[test]
    fn test_letter_spec_tile() {
        assert!(LetterSpec::new(BLANK, 2, 0).tile().is_blank);
        assert_eq!(LetterSpec::new('K', 1, 5).tile().score, 5);
    }

    #[test]
    fn test_config_builder() {
        let config = GameConfig::default()
            .with_dictionary("CSW19")
            .with_word_check(WordCheck::Reject)
            .with_challenge_penalty(ChallengePenalty::PerWord, 3)
            .with_timer(TimerType::Game, 600, 10)
            .with_players(2, Some(4))
            .with_seed(99);

        assert_eq!(config.dictionary.as_deref(), Some("CSW19"));
        assert_eq!(config.word_check, WordCheck::Reject);
        assert_eq!(config.challenge_penalty, ChallengePenalty::PerWord);
        assert_eq!(config.penalty_points, 3);
        assert_eq!(config.timer, TimerType::Game);
        assert_eq!(config.time_allowed, 600);
        assert_eq!(config.max_players, Some(4));
        assert_eq!(config.seed, 99);
        assert!(!config.predictable_bag);
    }

    #[test]
    fn test_config_serde() {
        let config = GameConfig::default().with_challenge_penalty(ChallengePenalty::None, 0);
        let json = serde_json::to_string(&config).unwrap();
        let restored: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
