//! Loading and caching dictionaries by name.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::dawg::Lexicon;
use super::error::LexiconError;

/// File extension of compiled dictionaries.
pub const DICT_EXTENSION: &str = "dict";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Dictionaries found in one directory, loaded on first use.
///
/// `load` hands out shared handles; loading the same name twice reads
/// the file once.
#[derive(Debug)]
pub struct LexiconLibrary {
    dir: PathBuf,
    cache: Mutex<FxHashMap<String, Arc<Lexicon>>>,
}

impl LexiconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding dictionary `name`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{DICT_EXTENSION}"))
    }

    /// Load dictionary `name` from `<dir>/<name>.dict`, or return the
    /// cached copy.
    pub fn load(&self, name: &str) -> Result<Arc<Lexicon>, LexiconError> {
        if let Some(lexicon) = self.cached(name) {
            return Ok(lexicon);
        }

        let path = self.path_of(name);
        let data = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LexiconError::NotFound {
                    name: name.to_owned(),
                    path: path.clone(),
                }
            } else {
                LexiconError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let lexicon = Arc::new(Lexicon::from_bytes(name, &decompress(&data)?)?);
        info!(dictionary = name, nodes = lexicon.node_count(), "loaded dictionary");

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(name.to_owned()).or_insert(lexicon)))
    }

    /// Register an already built dictionary under `name`.
    pub fn insert(&self, name: impl Into<String>, lexicon: Arc<Lexicon>) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), lexicon);
    }

    fn cached(&self, name: &str) -> Option<Arc<Lexicon>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Names of the dictionaries in the directory, sorted.
    pub fn available(&self) -> Result<Vec<String>, LexiconError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| LexiconError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == DICT_EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Undo whatever compression a dictionary file carries. Gzip and zstd are
/// recognised by their magic bytes; anything else is taken as raw.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, LexiconError> {
    if data.starts_with(&GZIP_MAGIC) {
        debug!("dictionary is gzip compressed");
        let mut out = Vec::new();
        flate2::read::GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(LexiconError::Decompress)?;
        Ok(out)
    } else if data.starts_with(&ZSTD_MAGIC) {
        debug!("dictionary is zstd compressed");
        zstd::stream::decode_all(data).map_err(LexiconError::Decompress)
    } else {
        Ok(data.to_vec())
    }
}

/// Gzip a compiled graph for writing to a `.dict` file.
pub fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}
