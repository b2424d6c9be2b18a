//! Decompound single words of compounding languages into their lexical parts.
//!
//! Given a frequency lexicon, a closed set of language-specific binding
//! morphemes, and optionally a prefix-pair similarity store, the
//! [`Splitter`] enumerates every admissible segmentation of a word, cleans
//! the candidate set through a configurable pipeline, and picks the best
//! candidate by a lexicographic tuple of configurable scores. The
//! [`evaluate`] harness scores predictions against a gold-annotated corpus.
//!
//! # Example
//! ```no_run
//! use compound_splitter::{Language, Lexicon, Splitter, SplitterConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SplitterConfig::new(Language::German);
//! let lexicon = Lexicon::load("lex".as_ref(), &config)?;
//! let splitter = Splitter::new(config, lexicon, None);
//! println!("{}", splitter.split_rendered("krankenhaus")); // kranken+haus
//! # Ok(()) }
//! ```

pub mod config;
pub mod evaluate;
pub mod lexicon;
pub mod splitter;
pub mod vectors;

pub use config::{CleanStage, ConfigError, Language, RankMethod, SplitterConfig};
pub use evaluate::{ErrorCounts, EvaluateError, Evaluation, Misprediction, evaluate};
pub use lexicon::{Lexicon, LexiconError};
pub use splitter::{RankedCandidate, Split, SplitIter, Splitter};
pub use vectors::{VectorError, VectorStore};
