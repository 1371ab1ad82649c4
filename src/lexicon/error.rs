use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a dictionary. Callers may carry on without one, in
/// which case word checks are skipped.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Dictionary {name} not found at {}", path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decompress dictionary: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("Malformed dictionary: {0}")]
    Malformed(String),
}
