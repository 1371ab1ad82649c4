//! Game history.
//!
//! - `Undo`: reverse and re-apply recorded turns
//! - `Replay`: rebuild a game from its turn records

pub mod replay;
pub mod undo;

pub use replay::Replay;
pub use undo::Undo;
