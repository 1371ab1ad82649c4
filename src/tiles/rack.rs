//! A player's rack.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::Tile;

/// A player's hand of tiles.
///
/// SmallVec keeps a standard 7-8 tile rack inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    tiles: SmallVec<[Tile; 8]>,
    capacity: usize,
}

impl Rack {
    /// Create an empty rack holding up to `capacity` tiles.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            tiles: SmallVec::new(),
            capacity,
        }
    }

    /// Nominal rack size. Not enforced by `add_tile`; the engine keeps
    /// racks within it by drawing at most as many tiles as were removed.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add a tile. The tile is lifted (position cleared, blank reset).
    pub fn add_tile(&mut self, tile: &Tile) {
        self.tiles.push(tile.lifted());
    }

    /// Remove a tile matching `tile` (see [`Tile::matches`]).
    ///
    /// Returns the removed tile, or `None` if no such tile is on the rack.
    pub fn remove_tile(&mut self, tile: &Tile) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.matches(tile))?;
        Some(self.tiles.remove(pos))
    }

    /// Check that every tile in `tiles` can be removed from this rack,
    /// counting duplicates. Returns the first tile that cannot.
    #[must_use]
    pub fn find_missing<'a>(&self, tiles: &'a [Tile]) -> Option<&'a Tile> {
        let mut available: Vec<&Tile> = self.tiles.iter().collect();
        for tile in tiles {
            match available.iter().position(|t| t.matches(tile)) {
                Some(i) => {
                    available.swap_remove(i);
                }
                None => return Some(tile),
            }
        }
        None
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Total face value of the tiles on the rack.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.tiles.iter().map(|t| t.score).sum()
    }

    /// Letters on the rack, blanks as `' '`.
    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.tiles.iter().map(Tile::bag_letter).collect()
    }
}
