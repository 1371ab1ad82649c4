//! The letter bag.
//!
//! The bag is an ordered pile with a top (the end of the vec). Normal
//! draws take a random tile; a *predictable* bag always draws from the
//! top and returns tiles to the bottom, so a caller who arranges the top
//! of the pile knows exactly what will be drawn. Replays rely on that.

use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::core::config::Edition;
use crate::core::rng::GameRng;

/// The pool of undrawn tiles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LetterBag {
    tiles: Vec<Tile>,
    rng: GameRng,
    predictable: bool,
}

impl LetterBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            tiles: Vec::new(),
            rng: GameRng::new(seed),
            predictable: false,
        }
    }

    /// Fill a bag with an edition's letter distribution.
    #[must_use]
    pub fn from_edition(edition: &Edition, seed: u64) -> Self {
        let mut bag = Self::new(seed);
        for spec in &edition.letters {
            for _ in 0..spec.count {
                bag.tiles.push(spec.tile());
            }
        }
        bag.rng.shuffle(&mut bag.tiles);
        bag
    }

    /// Switch predictable drawing on or off.
    pub fn set_predictable(&mut self, predictable: bool) {
        self.predictable = predictable;
    }

    #[must_use]
    pub fn is_predictable(&self) -> bool {
        self.predictable
    }

    /// Draw one tile, or `None` if the bag is empty.
    pub fn draw(&mut self) -> Option<Tile> {
        if self.tiles.is_empty() {
            return None;
        }
        if self.predictable {
            return self.tiles.pop();
        }
        let i = self.rng.gen_index(self.tiles.len());
        Some(self.tiles.swap_remove(i))
    }

    /// Draw up to `count` tiles; fewer if the bag runs out.
    pub fn draw_many(&mut self, count: usize) -> Vec<Tile> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw() {
                Some(tile) => drawn.push(tile),
                None => break,
            }
        }
        drawn
    }

    /// Return a tile to the bag. The tile is lifted first.
    pub fn return_tile(&mut self, tile: &Tile) {
        let tile = tile.lifted();
        if self.predictable {
            self.tiles.insert(0, tile);
        } else {
            self.tiles.push(tile);
        }
    }

    /// Remove a specific tile (see [`Tile::matches`]).
    pub fn remove_tile(&mut self, tile: &Tile) -> Option<Tile> {
        let pos = self.tiles.iter().rposition(|t| t.matches(tile))?;
        Some(self.tiles.remove(pos))
    }

    /// Rearrange the bag so the next draws yield `tiles`, in order.
    ///
    /// Returns the first tile that is not in the bag; the bag may then
    /// have been partially rearranged, but its contents are unchanged.
    pub fn stack(&mut self, tiles: &[Tile]) -> Result<(), Tile> {
        for tile in tiles.iter().rev() {
            let found = self.remove_tile(tile).ok_or_else(|| tile.clone())?;
            self.tiles.push(found);
        }
        Ok(())
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Letters in the bag, blanks as `' '`.
    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.tiles.iter().map(Tile::bag_letter).collect()
    }
}
