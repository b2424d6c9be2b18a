//! The segmentation engine: candidate enumeration, cleaning, ranking.
//!
//! A word is decompounded in three passes. [`Splitter::splits`] enumerates
//! every admissible left-to-right partition whose parts are binding
//! morphemes or lexicon words (with a single-part fallback for unknown
//! remainders). The cleaning pipeline then repairs or rejects candidates —
//! merging adjacent parts toward lexicon hits, absorbing trailing noise,
//! dropping splits with affix fragments — and the ranker orders survivors
//! by a lexicographic tuple of configured scores. Cleaning only ever merges
//! adjacent parts or rejects a whole split, so every surviving candidate
//! still concatenates to the original word.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, trace};

use crate::config::{CleanStage, RankMethod, SplitterConfig};
use crate::lexicon::{Lexicon, prefix_key};
use crate::vectors::VectorStore;

/// An ordered sequence of parts whose concatenation equals the word.
pub type Split = Vec<String>;

/// A candidate split with its configured score tuple, compared
/// lexicographically descending.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedCandidate {
    pub scores: Vec<f64>,
    pub split: Split,
}

/// The segmentation pipeline over one immutable lexicon and configuration.
pub struct Splitter {
    config: SplitterConfig,
    lexicon: Lexicon,
    vectors: Option<VectorStore>,
}

impl Splitter {
    pub fn new(config: SplitterConfig, lexicon: Lexicon, vectors: Option<VectorStore>) -> Self {
        Self {
            config,
            lexicon,
            vectors,
        }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Enumerate every admissible split of `word`, lazily.
    ///
    /// Each call returns a fresh enumeration; nothing is shared between
    /// iterators. The word is lowercased before enumeration.
    pub fn splits(&self, word: &str) -> SplitIter<'_> {
        let chars: Vec<char> = word.to_lowercase().chars().collect();
        let stack = if chars.is_empty() {
            Vec::new()
        } else {
            vec![Frame { start: 0, cut: 1 }]
        };
        SplitIter {
            splitter: self,
            chars,
            stack,
            parts: Vec::new(),
        }
    }

    /// Split `word` into its best decomposition.
    ///
    /// Falls back to the one-part split of the whole word when no candidate
    /// survives cleaning and ranking.
    pub fn split(&self, word: &str) -> Split {
        let normalized = word.to_lowercase();
        let inspecting = self.config.inspect.as_deref() == Some(normalized.as_str());
        debug!("splitting {normalized:?}");

        let raw: Vec<Split> = self.splits(&normalized).collect();
        if inspecting {
            info!("raw splits for {normalized:?}: {raw:?}");
        } else {
            trace!("raw splits: {raw:?}");
        }

        let cleaned = self.clean(raw);
        if inspecting {
            info!("cleaned splits for {normalized:?}: {cleaned:?}");
        } else {
            trace!("cleaned splits: {cleaned:?}");
        }

        let ranked = self.rank(cleaned);
        if inspecting {
            info!("ranked splits for {normalized:?}: {ranked:?}");
        } else {
            trace!("ranked splits: {ranked:?}");
        }

        match ranked.into_iter().next() {
            Some(best) => best.split,
            None => vec![normalized],
        }
    }

    /// Split and render in one step.
    pub fn split_rendered(&self, word: &str) -> String {
        self.render(&self.split(word))
    }

    /// Render a split with `+` before ordinary parts and `|` before binding
    /// morphemes, dropping the leading separator.
    pub fn render(&self, split: &[String]) -> String {
        let mut out = String::new();
        for part in split {
            out.push(if self.config.is_binding_morpheme(part) {
                '|'
            } else {
                '+'
            });
            out.push_str(part);
        }
        if out.is_empty() { out } else { out.split_off(1) }
    }

    /// Apply the configured cleaning pipeline, deduplicating the result.
    pub fn clean(&self, splits: Vec<Split>) -> Vec<Split> {
        let mut current = splits;
        for stage in &self.config.cleanings {
            trace!("cleaning ({})", stage.name());
            current = match stage {
                CleanStage::General => current
                    .into_iter()
                    .map(|split| self.clean_general(split))
                    .collect(),
                CleanStage::LastParts => current
                    .into_iter()
                    .map(|split| self.clean_last_parts(split))
                    .collect(),
                CleanStage::Suffix => current
                    .into_iter()
                    .map(|split| self.clean_suffix(split))
                    .collect(),
                CleanStage::Prefix => current
                    .into_iter()
                    .filter(|split| !split.iter().any(|p| self.lexicon.is_prefix_fragment(p)))
                    .collect(),
                CleanStage::Fragments => current
                    .into_iter()
                    .filter(|split| {
                        !split.iter().any(|p| {
                            p.chars().count() < 3 && !self.config.is_binding_morpheme(p)
                        })
                    })
                    .collect(),
            };
        }
        let mut seen = HashSet::new();
        current.retain(|split| seen.insert(split.clone()));
        current
    }

    /// Merge parts toward lexicon hits, scanning left to right.
    fn clean_general(&self, split: Split) -> Split {
        let mut cleaned = Vec::with_capacity(split.len());
        let mut i = 0;
        while i < split.len() {
            let merged = if i + 1 < split.len() {
                Some(format!("{}{}", split[i], split[i + 1]))
            } else {
                None
            };
            if self.lexicon.contains(&split[i]) {
                cleaned.push(split[i].clone());
            } else if let Some(merged) = &merged
                && self.lexicon.contains(merged)
            {
                cleaned.push(merged.clone());
                i += 1;
            } else if i == 0
                && self.config.is_binding_morpheme(&split[i])
                && let Some(merged) = merged
            {
                // A leading binding morpheme cannot stand alone.
                cleaned.push(merged);
                i += 1;
            } else {
                cleaned.push(split[i].clone());
            }
            i += 1;
        }
        cleaned
    }

    /// Merge trailing parts shorter than four characters into their
    /// predecessor.
    fn clean_last_parts(&self, mut split: Split) -> Split {
        while split.len() >= 2 && split.last().is_some_and(|part| part.chars().count() < 4) {
            if let Some(last) = split.pop()
                && let Some(prev) = split.last_mut()
            {
                prev.push_str(&last);
            }
        }
        split
    }

    /// Merge a final part that is nearly covered by a known suffix into its
    /// predecessor.
    fn clean_suffix(&self, mut split: Split) -> Split {
        while split.len() >= 2 && split.last().is_some_and(|part| self.lexicon.is_mostly_suffix(part)) {
            if let Some(last) = split.pop()
                && let Some(prev) = split.last_mut()
            {
                prev.push_str(&last);
            }
        }
        split
    }

    /// Score and sort candidates, descending by the configured score tuple.
    ///
    /// Exact score ties fall back to comparing the splits themselves, which
    /// keeps repeated runs deterministic. With force-split enabled,
    /// single-part candidates are dropped from the result.
    pub fn rank(&self, cleaned: Vec<Split>) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = cleaned
            .into_iter()
            .map(|split| {
                let scores = self
                    .config
                    .rankings
                    .iter()
                    .map(|method| self.score(*method, &split))
                    .collect();
                RankedCandidate { scores, split }
            })
            .collect();
        ranked.sort_by(|a, b| {
            for (x, y) in a.scores.iter().zip(&b.scores) {
                match y.total_cmp(x) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            b.split.cmp(&a.split)
        });
        if self.config.force_split {
            ranked.retain(|candidate| candidate.split.len() > 1);
        }
        ranked
    }

    fn score(&self, method: RankMethod, split: &Split) -> f64 {
        match method {
            RankMethod::AvgFrequency => {
                self.mean_over_content_parts(split, |part| self.lexicon.frequency(part) as f64)
            }
            RankMethod::BeginningFrequency => self.mean_over_content_parts(split, |part| {
                self.lexicon.beginning_frequency(part) as f64
            }),
            RankMethod::Longest => split.len() as f64,
            RankMethod::Shortest => -(split.len() as f64),
            RankMethod::NoSuffixes => {
                if split.iter().any(|part| self.lexicon.starts_with_suffix(part)) {
                    0.0
                } else {
                    1.0
                }
            }
            RankMethod::SemanticSimilarity => {
                let parts = self.content_parts(split);
                // Seeded with 0 so a single-part split scores 0.
                let mut sims = vec![0.0];
                for pair in parts.windows(2) {
                    sims.push(self.similarity(pair[0], pair[1]));
                }
                sims.iter().sum::<f64>() / sims.len() as f64
            }
            RankMethod::MostKnown => {
                let parts = self.content_parts(split);
                if parts.is_empty() {
                    return 0.0;
                }
                let known = parts.iter().filter(|part| self.is_known(part)).count();
                known as f64 / parts.len() as f64
            }
        }
    }

    /// Non-binding parts of a split, the ones frequency and similarity
    /// scoring look at.
    fn content_parts<'a>(&self, split: &'a [String]) -> Vec<&'a str> {
        split
            .iter()
            .map(String::as_str)
            .filter(|part| !self.config.is_binding_morpheme(part))
            .collect()
    }

    fn mean_over_content_parts(&self, split: &Split, score: impl Fn(&str) -> f64) -> f64 {
        let parts = self.content_parts(split);
        if parts.is_empty() {
            return 0.0;
        }
        parts.iter().map(|part| score(part)).sum::<f64>() / parts.len() as f64
    }

    fn similarity(&self, left: &str, right: &str) -> f64 {
        match &self.vectors {
            Some(store) => store
                .similarity(&prefix_key(left), &prefix_key(right))
                .unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// A part counts as known when it is a lexicon word directly, or when
    /// appending any configured negative morpheme makes it one.
    fn is_known(&self, part: &str) -> bool {
        self.lexicon.contains(part)
            || self
                .config
                .negative_morphemes
                .iter()
                .any(|morpheme| self.lexicon.contains(&format!("{part}{morpheme}")))
    }

    fn is_valid_part(&self, part: &str) -> bool {
        self.config.is_binding_morpheme(part) || self.lexicon.contains(part)
    }
}

struct Frame {
    /// Character offset where this remainder begins.
    start: usize,
    /// Exclusive end of the next left slice to try.
    cut: usize,
}

/// Depth-first enumeration of admissible splits, driven by an explicit
/// work stack so candidates are produced lazily.
pub struct SplitIter<'a> {
    splitter: &'a Splitter,
    chars: Vec<char>,
    stack: Vec<Frame>,
    parts: Vec<String>,
}

impl Iterator for SplitIter<'_> {
    type Item = Split;

    fn next(&mut self) -> Option<Split> {
        loop {
            let len = self.chars.len();
            let frame = self.stack.last_mut()?;
            if frame.cut > len {
                self.stack.pop();
                self.parts.pop();
                continue;
            }
            let (start, cut) = (frame.start, frame.cut);
            frame.cut += 1;

            let left: String = self.chars[start..cut].iter().collect();
            let at_end = cut == len;

            if self.splitter.is_valid_part(&left) {
                if at_end {
                    let mut split = self.parts.clone();
                    split.push(left);
                    return Some(split);
                }
                self.parts.push(left);
                self.stack.push(Frame {
                    start: cut,
                    cut: cut + 1,
                });
            } else if let Some(morpheme) = self.splitter.config.negative_morphemes.first() {
                // Only the first negative morpheme is ever consulted, and the
                // single-part fallback below is disabled entirely while a
                // negative-morpheme list is configured.
                if !at_end && self.splitter.lexicon.contains(&format!("{left}{morpheme}")) {
                    self.parts.push(left);
                    self.stack.push(Frame {
                        start: cut,
                        cut: cut + 1,
                    });
                }
            } else if at_end {
                // Even a wholly unknown remainder has its trivial one-part
                // decomposition.
                let mut split = self.parts.clone();
                split.push(left);
                return Some(split);
            }
        }
    }
}
