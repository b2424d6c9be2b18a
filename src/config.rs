//! Immutable splitter configuration.
//!
//! Everything that varies per run lives here: the language (which fixes the
//! closed set of binding morphemes), the lexicon thresholds, and the ordered
//! lists of cleaning stages and ranking methods. Stage and method names are
//! validated against a static registry at configuration time, so an
//! unrecognized name fails before any word is processed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("unknown ranking method: {0}")]
    UnknownRanking(String),
    #[error("unknown cleaning stage: {0}")]
    UnknownCleaning(String),
}

/// A language with a known binding-morpheme inventory.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Language {
    German,
    Swedish,
    Hungarian,
}

impl Language {
    /// ISO-style code used in data file names (`de.lexicon.tsv` etc.).
    pub fn code(self) -> &'static str {
        match self {
            Language::German => "de",
            Language::Swedish => "sv",
            Language::Hungarian => "hu",
        }
    }

    /// The closed set of linking morphemes for this language.
    pub fn binding_morphemes(self) -> &'static [&'static str] {
        match self {
            Language::German => &["s", "e", "en", "nen", "ens", "es", "ns", "er", "n"],
            Language::Swedish => &["s"],
            Language::Hungarian => &["ó", "ő", "ba", "ítő", "es", "s", "i", "a"],
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "de" => Ok(Language::German),
            "sv" => Ok(Language::Swedish),
            "hu" => Ok(Language::Hungarian),
            other => Err(ConfigError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// One pluggable scoring criterion; each configured method contributes one
/// position in the lexicographic ranking tuple.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RankMethod {
    AvgFrequency,
    BeginningFrequency,
    Longest,
    Shortest,
    NoSuffixes,
    SemanticSimilarity,
    MostKnown,
}

impl RankMethod {
    pub fn name(self) -> &'static str {
        match self {
            RankMethod::AvgFrequency => "avg_frequency",
            RankMethod::BeginningFrequency => "beginning_frequency",
            RankMethod::Longest => "longest",
            RankMethod::Shortest => "shortest",
            RankMethod::NoSuffixes => "no_suffixes",
            RankMethod::SemanticSimilarity => "semantic_similarity",
            RankMethod::MostKnown => "most_known",
        }
    }
}

impl FromStr for RankMethod {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "avg_frequency" => Ok(RankMethod::AvgFrequency),
            "beginning_frequency" => Ok(RankMethod::BeginningFrequency),
            "longest" => Ok(RankMethod::Longest),
            "shortest" => Ok(RankMethod::Shortest),
            "no_suffixes" => Ok(RankMethod::NoSuffixes),
            "semantic_similarity" => Ok(RankMethod::SemanticSimilarity),
            "most_known" => Ok(RankMethod::MostKnown),
            other => Err(ConfigError::UnknownRanking(other.to_string())),
        }
    }
}

impl fmt::Display for RankMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One stage of the candidate-cleaning pipeline. Transforms merge adjacent
/// parts; filters reject whole splits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CleanStage {
    General,
    LastParts,
    Suffix,
    Prefix,
    Fragments,
}

impl CleanStage {
    pub fn name(self) -> &'static str {
        match self {
            CleanStage::General => "general",
            CleanStage::LastParts => "last_parts",
            CleanStage::Suffix => "suffix",
            CleanStage::Prefix => "prefix",
            CleanStage::Fragments => "fragments",
        }
    }
}

impl FromStr for CleanStage {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "general" => Ok(CleanStage::General),
            "last_parts" => Ok(CleanStage::LastParts),
            "suffix" => Ok(CleanStage::Suffix),
            "prefix" => Ok(CleanStage::Prefix),
            "fragments" => Ok(CleanStage::Fragments),
            other => Err(ConfigError::UnknownCleaning(other.to_string())),
        }
    }
}

impl fmt::Display for CleanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-run configuration, constructed once and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct SplitterConfig {
    pub language: Language,
    pub force_split: bool,
    pub use_stopwords: bool,
    /// Minimum lexicon frequency for a word to be indexed.
    pub min_freq: u64,
    /// Consider only the first n lexicon lines, if set.
    pub limit: Option<usize>,
    pub rankings: Vec<RankMethod>,
    pub cleanings: Vec<CleanStage>,
    /// Extension point: a part is also valid when `part + morpheme` is a
    /// lexicon word. Ships empty for every supported language.
    pub negative_morphemes: Vec<String>,
    /// Emit extra `info!` traces for this exact (lowercased) word.
    pub inspect: Option<String>,
}

impl SplitterConfig {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            force_split: false,
            use_stopwords: true,
            min_freq: 2,
            limit: Some(125_000),
            rankings: vec![
                RankMethod::MostKnown,
                RankMethod::SemanticSimilarity,
                RankMethod::Shortest,
            ],
            cleanings: vec![
                CleanStage::General,
                CleanStage::LastParts,
                CleanStage::Prefix,
                CleanStage::Fragments,
                CleanStage::Suffix,
            ],
            negative_morphemes: Vec::new(),
            inspect: None,
        }
    }

    /// Parse a comma-separated ranking list, e.g. `most_known,shortest`.
    pub fn parse_rankings(raw: &str) -> Result<Vec<RankMethod>, ConfigError> {
        raw.split(',')
            .filter(|name| !name.is_empty())
            .map(RankMethod::from_str)
            .collect()
    }

    /// Parse a comma-separated cleaning list, e.g. `general,fragments`.
    pub fn parse_cleanings(raw: &str) -> Result<Vec<CleanStage>, ConfigError> {
        raw.split(',')
            .filter(|name| !name.is_empty())
            .map(CleanStage::from_str)
            .collect()
    }

    pub fn is_binding_morpheme(&self, part: &str) -> bool {
        self.language.binding_morphemes().contains(&part)
    }

    /// Whether the configured rankings require the vector store.
    pub fn wants_vectors(&self) -> bool {
        self.rankings.contains(&RankMethod::SemanticSimilarity)
    }
}
