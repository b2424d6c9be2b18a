//! Distributional-similarity oracle.
//!
//! A pre-serialized, read-only store mapping pairs of six-character part
//! prefixes to a similarity score. The store is a JSON object of the shape
//! `{"kranke": {"hausbe": 0.42, ...}, ...}`; lookups are symmetric and a
//! miss simply means "no evidence", which callers treat as similarity 0.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("failed to read vector store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse vector store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Prefix-pair similarity store.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct VectorStore {
    pairs: HashMap<String, HashMap<String, f64>>,
}

impl VectorStore {
    pub fn load(path: &Path) -> Result<Self, VectorError> {
        let file = File::open(path).map_err(|source| VectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| VectorError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "loaded vector store with {} prefix entries from {}",
            store.pairs.len(),
            path.display()
        );
        Ok(store)
    }

    /// Similarity between two prefixes, in either key order. `None` means
    /// the pair is unknown to the store.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        self.pairs
            .get(a)
            .and_then(|row| row.get(b))
            .or_else(|| self.pairs.get(b).and_then(|row| row.get(a)))
            .copied()
    }
}
