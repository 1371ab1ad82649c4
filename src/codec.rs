//! Binary encoding of games, turns and notifications.
//!
//! Anything serde can describe travels as bincode. A game snapshot keeps
//! its rng state, so a restored game draws the same tiles the saved one
//! would have.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::Game;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Cannot encode: {0}")]
    Encode(#[source] bincode::Error),
    #[error("Cannot decode: {0}")]
    Decode(#[source] bincode::Error),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(CodecError::Encode)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}

/// Write a snapshot to `path`.
pub fn save_game(game: &Game, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let bytes = encode(game)?;
    std::fs::write(path, &bytes).map_err(|source| CodecError::Io {
        path: path.to_owned(),
        source,
    })?;
    debug!(game = %game.key, path = %path.display(), bytes = bytes.len(), "saved game");
    Ok(())
}

/// Read a snapshot written by [`save_game`].
pub fn load_game(path: impl AsRef<Path>) -> Result<Game, CodecError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CodecError::Io {
        path: path.to_owned(),
        source,
    })?;
    decode(&bytes)
}
