//! The board grid.

use serde::{Deserialize, Serialize};

use super::tile::{Coord, Tile};

/// A rectangular grid of squares, each empty or holding one tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    squares: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            squares: vec![None; rows * cols],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, at: Coord) -> Option<usize> {
        (at.row < self.rows && at.col < self.cols).then(|| at.row * self.cols + at.col)
    }

    /// Tile at a square.
    #[must_use]
    pub fn at(&self, at: Coord) -> Option<&Tile> {
        self.index(at).and_then(|i| self.squares[i].as_ref())
    }

    /// Whether a tile could be placed at `at`: on the board and empty.
    #[must_use]
    pub fn is_free(&self, at: Coord) -> bool {
        self.index(at).is_some_and(|i| self.squares[i].is_none())
    }

    /// Put a tile on its square. The tile must carry a position.
    ///
    /// Returns `false` (and leaves the board untouched) if the tile has
    /// no position or the square is off the board or occupied.
    pub fn place(&mut self, tile: Tile) -> bool {
        let Some(at) = tile.position else {
            return false;
        };
        match self.index(at) {
            Some(i) if self.squares[i].is_none() => {
                self.squares[i] = Some(tile);
                true
            }
            _ => false,
        }
    }

    /// Lift the tile off a square.
    pub fn take(&mut self, at: Coord) -> Option<Tile> {
        let i = self.index(at)?;
        self.squares[i].take()
    }

    /// All tiles on the board, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.squares.iter().flatten()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(Option::is_none)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let c = self.at(Coord::new(row, col)).map_or('.', |t| t.letter);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
