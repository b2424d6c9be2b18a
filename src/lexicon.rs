//! Language lexicon: word frequencies, beginnings index, affix sets.
//!
//! Loaded once at startup from plain-text files under a lexicon directory
//! (`de.lexicon.tsv`, `de.stopwords.txt`, `de.suffixes.txt`,
//! `de.prefixes.txt` for German) and read-only afterwards. Words shorter
//! than four characters or below the configured minimum frequency are
//! dropped at load time; the beginnings index aggregates frequencies per
//! six-character word prefix in the same pass.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::SplitterConfig;

/// Words below this length never enter the lexicon.
pub const MIN_WORD_LEN: usize = 4;
/// Key length for the beginnings index and vector-store lookups.
pub const PREFIX_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed line {lineno} in {path}: {line:?}")]
    MalformedLine {
        path: PathBuf,
        lineno: usize,
        line: String,
    },
}

/// Frequency lexicon plus affix sets for one language.
#[derive(Debug, Default)]
pub struct Lexicon {
    words: HashMap<String, u64>,
    beginnings: HashMap<String, u64>,
    suffixes: HashSet<String>,
    prefixes: HashSet<String>,
}

impl Lexicon {
    /// Load every lexicon file for the configured language from `dir`.
    pub fn load(dir: &Path, config: &SplitterConfig) -> Result<Self, LexiconError> {
        let code = config.language.code();
        let mut lexicon = Self::default();

        let lexicon_path = dir.join(format!("{code}.lexicon.tsv"));
        info!("loading lexicon from {}", lexicon_path.display());
        for (lineno, line) in read_lines(&lexicon_path)?.enumerate() {
            if let Some(limit) = config.limit
                && lineno >= limit
            {
                break;
            }
            let line = io_context(&lexicon_path, line)?;
            let mut fields = line.split_whitespace();
            let (Some(word), Some(count), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(LexiconError::MalformedLine {
                    path: lexicon_path.clone(),
                    lineno: lineno + 1,
                    line,
                });
            };
            let Ok(count) = count.parse::<u64>() else {
                return Err(LexiconError::MalformedLine {
                    path: lexicon_path.clone(),
                    lineno: lineno + 1,
                    line: line.clone(),
                });
            };
            if word.chars().count() < MIN_WORD_LEN || count < config.min_freq {
                continue;
            }
            let word = word.to_lowercase();
            *lexicon.beginnings.entry(prefix_key(&word)).or_insert(0) += count;
            *lexicon.words.entry(word).or_insert(0) += count;
        }
        info!("indexed {} lexicon words", lexicon.words.len());

        if config.use_stopwords {
            let stopwords_path = dir.join(format!("{code}.stopwords.txt"));
            let mut removed = 0usize;
            for line in read_lines(&stopwords_path)? {
                let line = io_context(&stopwords_path, line)?;
                let word = line.trim();
                if lexicon.words.remove(word).is_some() {
                    removed += 1;
                }
            }
            debug!("removed {removed} stopwords from the lexicon");
        }

        let suffixes_path = dir.join(format!("{code}.suffixes.txt"));
        for line in read_lines(&suffixes_path)? {
            let line = io_context(&suffixes_path, line)?;
            let suffix = line.trim();
            // Two-character suffixes are too ambiguous to be useful.
            if suffix.chars().count() > 2 {
                lexicon.suffixes.insert(suffix.to_string());
            }
        }

        let prefixes_path = dir.join(format!("{code}.prefixes.txt"));
        for line in read_lines(&prefixes_path)? {
            let line = io_context(&prefixes_path, line)?;
            let prefix = line.trim();
            if !prefix.is_empty() {
                lexicon.prefixes.insert(prefix.to_string());
            }
        }

        debug!(
            "loaded {} suffixes and {} prefixes",
            lexicon.suffixes.len(),
            lexicon.prefixes.len()
        );
        Ok(lexicon)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.words.get(word).copied().unwrap_or(0)
    }

    /// Aggregated frequency of all lexicon words sharing `word`'s six-character
    /// prefix.
    pub fn beginning_frequency(&self, word: &str) -> u64 {
        self.beginnings.get(&prefix_key(word)).copied().unwrap_or(0)
    }

    /// Whether `part` begins with any known suffix string.
    pub fn starts_with_suffix(&self, part: &str) -> bool {
        self.suffixes.iter().any(|suffix| part.starts_with(suffix))
    }

    /// Whether `part` begins with a known suffix that covers nearly the whole
    /// part (at most two trailing characters beyond the suffix).
    pub fn is_mostly_suffix(&self, part: &str) -> bool {
        let part_len = part.chars().count();
        self.suffixes
            .iter()
            .any(|suffix| part.starts_with(suffix) && part_len.saturating_sub(2) <= suffix.chars().count())
    }

    /// Whether `part` is a known bound-prefix fragment.
    pub fn is_prefix_fragment(&self, part: &str) -> bool {
        self.prefixes.contains(part)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// First [`PREFIX_LEN`] characters of a word, the key shared by the
/// beginnings index and the vector store.
pub fn prefix_key(word: &str) -> String {
    word.chars().take(PREFIX_LEN).collect()
}

fn read_lines(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>, LexiconError> {
    let file = File::open(path).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file).lines())
}

fn io_context(path: &Path, line: std::io::Result<String>) -> Result<String, LexiconError> {
    line.map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })
}
