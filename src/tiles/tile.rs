//! Tiles and board coordinates.

use serde::{Deserialize, Serialize};

/// Letter carried by a blank tile that has not been assigned a letter.
pub const BLANK: char = ' ';

/// A square on the board, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{},{}", self.row, self.col)
    }
}

/// A letter tile.
///
/// A blank sits in the bag and on racks with letter [`BLANK`]; once
/// placed it carries the letter the player assigned to it, and scores
/// nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub letter: char,
    pub score: i32,
    pub is_blank: bool,
    /// Where the tile sits, when it is on the board or part of a move.
    pub position: Option<Coord>,
}

impl Tile {
    /// A lettered tile.
    #[must_use]
    pub fn new(letter: char, score: i32) -> Self {
        Self {
            letter,
            score,
            is_blank: false,
            position: None,
        }
    }

    /// An unassigned blank.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            letter: BLANK,
            score: 0,
            is_blank: true,
            position: None,
        }
    }

    /// Place this tile at a board position.
    #[must_use]
    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.position = Some(Coord::new(row, col));
        self
    }

    /// Assign a letter to a blank (no-op for lettered tiles).
    #[must_use]
    pub fn as_letter(mut self, letter: char) -> Self {
        if self.is_blank {
            self.letter = letter;
        }
        self
    }

    /// The tile as it sits on a rack or in the bag: no position, and a
    /// blank forgets its assigned letter.
    #[must_use]
    pub fn lifted(&self) -> Self {
        Self {
            letter: if self.is_blank { BLANK } else { self.letter },
            score: self.score,
            is_blank: self.is_blank,
            position: None,
        }
    }

    /// Whether `other` is the same kind of tile, ignoring position.
    /// All blanks match each other.
    #[must_use]
    pub fn matches(&self, other: &Tile) -> bool {
        if self.is_blank || other.is_blank {
            self.is_blank && other.is_blank
        } else {
            self.letter == other.letter
        }
    }

    /// Letter as recorded in bag inventories: blanks are [`BLANK`].
    #[must_use]
    pub fn bag_letter(&self) -> char {
        if self.is_blank {
            BLANK
        } else {
            self.letter
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{:?},{}", self.letter, self.score)?;
        if let Some(pos) = self.position {
            write!(f, ",{pos}")?;
        }
        write!(f, "}}")
    }
}
