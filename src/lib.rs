//! # rust-wordgame
//!
//! The turn engine of a multiplayer word-tile board game, and the
//! dictionary it checks words against.
//!
//! ## Design Principles
//!
//! 1. **Client-Scored Moves**: Clients compute the words and score of a
//!    play. The engine moves tiles, keeps score and checks words against
//!    the dictionary; it never re-derives a score.
//!
//! 2. **Everything Is a Turn**: Every state change is recorded as a
//!    [`Turn`] and broadcast. Undo, redo and replay work from those
//!    records alone.
//!
//! 3. **Deterministic by Seed**: Game keys and bag draws come from a
//!    seeded ChaCha8 stream, so a seeded game plays out identically.
//!
//! ## Modules
//!
//! - `core`: players, turns, game state, configuration, RNG, errors
//! - `tiles`: tiles, racks, the letter bag and the board
//! - `lexicon`: DAWG dictionaries, their loader and builder
//! - `notify`: messages to players and the channel they travel on
//! - `advice`: the seam to an external best-play search
//! - `rules`: the `GameEngine` command surface and `TurnEngine`
//! - `history`: undo, redo and replay
//! - `codec`: binary game snapshots

pub mod core;
pub mod tiles;
pub mod lexicon;
pub mod notify;
pub mod advice;
pub mod rules;
pub mod history;
pub mod codec;

// Re-export commonly used types
pub use crate::core::{
    ChallengePenalty, Edition, GameConfig, LetterSpec, TimerType, WordCheck,
    GameError,
    Player, PlayerKey,
    GameRng, GameRngState,
    Game, GameKey, GameState,
    Move, ScoreDelta, Turn, TurnType, WordScore,
};

pub use crate::tiles::{Board, Coord, LetterBag, Rack, Tile, BLANK};

pub use crate::lexicon::{DawgBuilder, Lexicon, LexiconError, LexiconLibrary};

pub use crate::notify::{Audience, Channel, Message, Notification, RecordingChannel};

pub use crate::advice::{BestPlayFinder, SearchRequest, TimeLimitedFinder};

pub use crate::rules::{dispatch, Command, CommandTag, GameEngine, GameResult, TurnEngine};

pub use crate::history::{Replay, Undo};

pub use crate::codec::{decode, encode, load_game, save_game, CodecError};
