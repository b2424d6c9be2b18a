//! Scoring predicted segmentations against a gold-annotated corpus.
//!
//! Gold files carry one `original<TAB>gold` pair per line, where the gold
//! string marks compound boundaries with `+`, binding morphemes with `|`,
//! and may carry parenthetical annotations. Each original is run through
//! the full split pipeline, both strings are normalized (final inflectional
//! endings after the last `+` ignored, `|` and parentheses stripped), and
//! the outcome lands in a confusion matrix plus an over/under/wrong error
//! breakdown.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::splitter::Splitter;

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("failed to read gold file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed gold line {lineno} in {path}: {line:?}")]
    MalformedLine {
        path: PathBuf,
        lineno: usize,
        line: String,
    },
    /// Gold says non-compound and we predicted no compound either, yet the
    /// strings differ. The pipeline never alters characters, so this can
    /// only be a bug in classification or cleaning.
    #[error("inconsistent judgement for {original:?}: gold {gold:?} vs predicted {predicted:?}")]
    Inconsistent {
        original: String,
        gold: String,
        predicted: String,
    },
}

/// Segmentation-boundary error counts, tracked independently of the
/// confusion matrix.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ErrorCounts {
    /// Predicted fewer `+` boundaries than gold.
    pub under: usize,
    /// Predicted more `+` boundaries than gold.
    pub over: usize,
    /// Predicted a compound, but segmented it incorrectly.
    pub wrong: usize,
}

/// One mis-predicted gold entry, retained for `--print-wrong` style reports.
#[derive(Clone, Debug, Serialize)]
pub struct Misprediction {
    pub original: String,
    pub gold: String,
    pub predicted: String,
}

/// Full evaluation report over one gold file.
#[derive(Clone, Debug, Serialize)]
pub struct Evaluation {
    pub precision: f64,
    pub recall: f64,
    pub accuracy: f64,
    pub quasi_f: f64,
    pub coverage: f64,
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub incorrectly_split: usize,
    pub errors: ErrorCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mispredictions: Vec<Misprediction>,
}

/// Run the split pipeline over every entry of `gold_path` and aggregate the
/// outcomes.
pub fn evaluate(splitter: &Splitter, gold_path: &Path) -> Result<Evaluation, EvaluateError> {
    let file = File::open(gold_path).map_err(|source| EvaluateError::Io {
        path: gold_path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut true_positives = 0usize;
    let mut true_negatives = 0usize;
    let mut false_positives = 0usize;
    let mut false_negatives = 0usize;
    let mut incorrectly_split = 0usize;
    let mut errors = ErrorCounts::default();
    let mut mispredictions = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| EvaluateError::Io {
            path: gold_path.to_path_buf(),
            source,
        })?;
        let line = line.to_lowercase();
        let mut fields = line.split_whitespace();
        let (Some(original), Some(gold), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(EvaluateError::MalformedLine {
                path: gold_path.to_path_buf(),
                lineno: lineno + 1,
                line,
            });
        };

        let predicted = splitter.split_rendered(original);
        let (gold_norm, predicted_norm) = normalize_pair(gold, &predicted);
        debug!("{original}: gold {gold_norm:?}, predicted {predicted_norm:?}");

        let gold_plusses = gold_norm.matches('+').count();
        let predicted_plusses = predicted_norm.matches('+').count();
        if predicted_plusses < gold_plusses {
            errors.under += 1;
        } else if predicted_plusses > gold_plusses {
            errors.over += 1;
        }

        let misprediction = Misprediction {
            original: original.to_string(),
            gold: gold_norm.clone(),
            predicted: predicted_norm.clone(),
        };

        if !gold_norm.contains('+') {
            if gold_norm == predicted_norm {
                true_negatives += 1;
            } else if predicted_norm.contains('+') {
                false_positives += 1;
                mispredictions.push(misprediction);
            } else {
                return Err(EvaluateError::Inconsistent {
                    original: original.to_string(),
                    gold: gold_norm,
                    predicted: predicted_norm,
                });
            }
        } else if gold_norm == predicted_norm {
            true_positives += 1;
        } else if !predicted_norm.contains('+') {
            false_negatives += 1;
            mispredictions.push(misprediction);
        } else {
            incorrectly_split += 1;
            errors.wrong += 1;
            mispredictions.push(misprediction);
        }
    }

    let tp = true_positives as f64;
    let tn = true_negatives as f64;
    let fp = false_positives as f64;
    let fn_ = false_negatives as f64;
    let wrong = incorrectly_split as f64;
    let total = tp + tn + fp + fn_ + wrong;

    // Nothing predicted as a compound means perfect precision by convention.
    let precision = ratio_or(tp, tp + fp + wrong, 1.0);
    let recall = ratio_or(tp, tp + fp + fn_, 0.0);
    let accuracy = ratio_or(tp + tn, total, 0.0);
    let quasi_f = ratio_or(2.0 * precision * recall, precision + recall, 0.0);
    let coverage = ratio_or(tp + wrong, tp + wrong + fn_, 0.0);

    Ok(Evaluation {
        precision,
        recall,
        accuracy,
        quasi_f,
        coverage,
        true_positives,
        true_negatives,
        false_positives,
        false_negatives,
        incorrectly_split,
        errors,
        mispredictions,
    })
}

/// Normalize a gold/predicted pair for comparison: when both mark at least
/// one compound boundary, ignore everything after the last `+` (differences
/// in a final inflectional ending), then strip binding-morpheme markers from
/// both and parenthetical annotations from gold.
fn normalize_pair(gold: &str, predicted: &str) -> (String, String) {
    let (mut gold, mut predicted) = (gold.to_string(), predicted.to_string());
    if gold.contains('+') && predicted.contains('+') {
        gold = truncate_after_last_plus(&gold);
        predicted = truncate_after_last_plus(&predicted);
    }
    gold.retain(|c| c != '|' && c != '(' && c != ')');
    predicted.retain(|c| c != '|');
    (gold, predicted)
}

fn truncate_after_last_plus(s: &str) -> String {
    match s.rfind('+') {
        Some(i) => s[..=i].to_string(),
        None => s.to_string(),
    }
}

fn ratio_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}
