//! Tile containers.
//!
//! Tiles move between three containers over a game:
//!
//! - `LetterBag`: the pool of undrawn tiles (ordered, drawn at random
//!   unless the bag is predictable)
//! - `Rack`: a player's hand of drawable tiles
//! - `Board`: the grid tiles are placed on
//!
//! The turn engine moves tiles between them; the containers only enforce
//! their own bookkeeping.

pub mod tile;
pub mod rack;
pub mod bag;
pub mod board;

pub use tile::{Coord, Tile, BLANK};
pub use rack::Rack;
pub use bag::LetterBag;
pub use board::Board;
