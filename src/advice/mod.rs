//! The seam to the best-play search.
//!
//! Searching for the best play is someone else's problem; the engine only
//! asks a [`BestPlayFinder`] for a suggestion when giving advice or hints.
//! A search that runs too long is abandoned through
//! [`TimeLimitedFinder`], and simply produces no advice.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use tracing::warn;

use crate::core::{Edition, Move};
use crate::lexicon::Lexicon;
use crate::tiles::{Board, Tile};

/// Everything a search needs, detached from the game.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub edition: Edition,
    pub board: Board,
    pub rack: Vec<Tile>,
    pub lexicon: Arc<Lexicon>,
}

/// Finds the highest scoring play for a rack.
pub trait BestPlayFinder: Send + Sync {
    /// The best play found, or `None` if there is no play.
    fn find_best_play(&self, request: &SearchRequest) -> Option<Move>;
}

impl<F> BestPlayFinder for F
where
    F: Fn(&SearchRequest) -> Option<Move> + Send + Sync,
{
    fn find_best_play(&self, request: &SearchRequest) -> Option<Move> {
        self(request)
    }
}

/// Runs a search on a worker thread and gives up after a wall-clock limit.
///
/// An abandoned search keeps its thread until it finishes; its result is
/// discarded.
pub struct TimeLimitedFinder<F> {
    inner: Arc<F>,
    limit: Duration,
}

impl<F: BestPlayFinder + 'static> TimeLimitedFinder<F> {
    pub fn new(inner: F, limit: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            limit,
        }
    }

    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl<F: BestPlayFinder + 'static> BestPlayFinder for TimeLimitedFinder<F> {
    fn find_best_play(&self, request: &SearchRequest) -> Option<Move> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let spawned = std::thread::Builder::new()
            .name("best-play".into())
            .spawn(move || {
                // The receiver may have given up already.
                let _ = tx.send(inner.find_best_play(&request));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start best-play search");
            return None;
        }
        match rx.recv_timeout(self.limit) {
            Ok(found) => found,
            Err(_) => {
                warn!(limit_ms = self.limit.as_millis() as u64, "best-play search timed out");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::DawgBuilder;

    fn request() -> SearchRequest {
        let bytes = DawgBuilder::from_words(["AT"]).build();
        SearchRequest {
            edition: Edition::english(),
            board: Board::new(15, 15),
            rack: vec![Tile::new('A', 1), Tile::new('T', 1)],
            lexicon: Arc::new(Lexicon::from_bytes("t", &bytes).unwrap()),
        }
    }

    fn at_finder(req: &SearchRequest) -> Option<Move> {
        let placements: Vec<Tile> = req
            .rack
            .iter()
            .enumerate()
            .map(|(i, t)| t.clone().at(7, 7 + i))
            .collect();
        Some(Move::new(&placements, 4).with_word("AT", 4))
    }

    #[test]
    fn test_closure_finder() {
        let found = at_finder.find_best_play(&request());
        assert_eq!(found.map(|m| m.score), Some(4));
    }

    #[test]
    fn test_time_limited_returns_result() {
        let finder = TimeLimitedFinder::new(at_finder, Duration::from_secs(5));
        assert!(finder.find_best_play(&request()).is_some());
    }

    #[test]
    fn test_time_limited_gives_up() {
        let slow = |req: &SearchRequest| {
            std::thread::sleep(Duration::from_millis(500));
            at_finder(req)
        };
        let finder = TimeLimitedFinder::new(slow, Duration::from_millis(10));
        assert!(finder.find_best_play(&request()).is_none());
    }
}
