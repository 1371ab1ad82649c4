//! Dictionaries: a compressed word graph (DAWG) answering membership and
//! anagram queries.
//!
//! ## Components
//!
//! - `Lexicon`: an immutable graph plus a whitelist of player-added words
//! - `LexiconLibrary`: loads `.dict` files by name and caches them
//! - `DawgBuilder`: compiles a word list into the `.dict` format

pub mod builder;
pub mod dawg;
pub mod error;
pub mod library;

pub use builder::DawgBuilder;
pub use dawg::{Lexicon, LexiconNode};
pub use error::LexiconError;
pub use library::{compress, decompress, LexiconLibrary, DICT_EXTENSION};
