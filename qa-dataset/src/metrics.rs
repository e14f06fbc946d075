//! SQuAD exact-match / F1 scoring and answer extraction from model output.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DatasetError, Result};

static ARTICLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(a|an|the)\b").expect("static regex"));

/// Mean scores over an evaluation set, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SquadMetrics {
    #[serde(rename = "EM")]
    pub em: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
}

/// Lowercase, drop ASCII punctuation, blank out articles, collapse whitespace.
pub fn normalize_answer(s: &str) -> String {
    let lower = s.to_lowercase();
    let no_punct: String = lower.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let no_articles = ARTICLES.replace_all(&no_punct, " ");
    no_articles.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `1.0` when both sides normalize to the same string, else `0.0`.
pub fn exact_match_score(prediction: &str, ground_truth: &str) -> f64 {
    if normalize_answer(prediction) == normalize_answer(ground_truth) {
        1.0
    } else {
        0.0
    }
}

/// Token-level F1 over normalized whitespace tokens (multiset overlap).
///
/// If either side has no tokens the score is `1.0` only when both are empty.
pub fn f1_score(prediction: &str, ground_truth: &str) -> f64 {
    let pred = normalize_answer(prediction);
    let gold = normalize_answer(ground_truth);
    let pred_tokens: Vec<&str> = pred.split_whitespace().collect();
    let gold_tokens: Vec<&str> = gold.split_whitespace().collect();

    if pred_tokens.is_empty() || gold_tokens.is_empty() {
        return if pred_tokens == gold_tokens { 1.0 } else { 0.0 };
    }

    let mut gold_counts: HashMap<&str, usize> = HashMap::new();
    for &t in &gold_tokens {
        *gold_counts.entry(t).or_default() += 1;
    }
    let mut num_same = 0usize;
    for t in &pred_tokens {
        if let Some(n) = gold_counts.get_mut(t).filter(|n| **n > 0) {
            *n -= 1;
            num_same += 1;
        }
    }

    if num_same == 0 {
        return 0.0;
    }
    let precision = num_same as f64 / pred_tokens.len() as f64;
    let recall = num_same as f64 / gold_tokens.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Best score of `prediction` against any of `ground_truths`; `0.0` for an empty gold set.
pub fn metric_max_over_ground_truths<F>(metric: F, prediction: &str, ground_truths: &[String]) -> f64
where
    F: Fn(&str, &str) -> f64,
{
    ground_truths
        .iter()
        .map(|gt| metric(prediction, gt))
        .fold(0.0, f64::max)
}

/// Pairwise EM/F1 averaged over the set.
///
/// # Errors
/// [`DatasetError::LengthMismatch`] when the slices differ in length,
/// [`DatasetError::EmptyEvaluation`] when they are empty.
pub fn compute_squad_metrics<P, G>(predictions: &[P], ground_truths: &[G]) -> Result<SquadMetrics>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    if predictions.len() != ground_truths.len() {
        return Err(DatasetError::LengthMismatch {
            predictions: predictions.len(),
            ground_truths: ground_truths.len(),
        });
    }
    if predictions.is_empty() {
        return Err(DatasetError::EmptyEvaluation);
    }

    let (mut em, mut f1) = (0.0, 0.0);
    for (p, g) in predictions.iter().zip(ground_truths) {
        em += exact_match_score(p.as_ref(), g.as_ref());
        f1 += f1_score(p.as_ref(), g.as_ref());
    }
    let n = predictions.len() as f64;
    Ok(SquadMetrics { em: em / n, f1: f1 / n })
}

/// Like [`compute_squad_metrics`] but each prediction is scored against its best gold answer.
pub fn compute_squad_metrics_multi<P>(predictions: &[P], ground_truths: &[Vec<String>]) -> Result<SquadMetrics>
where
    P: AsRef<str>,
{
    if predictions.len() != ground_truths.len() {
        return Err(DatasetError::LengthMismatch {
            predictions: predictions.len(),
            ground_truths: ground_truths.len(),
        });
    }
    if predictions.is_empty() {
        return Err(DatasetError::EmptyEvaluation);
    }

    let (mut em, mut f1) = (0.0, 0.0);
    for (p, golds) in predictions.iter().zip(ground_truths) {
        em += metric_max_over_ground_truths(exact_match_score, p.as_ref(), golds);
        f1 += metric_max_over_ground_truths(f1_score, p.as_ref(), golds);
    }
    let n = predictions.len() as f64;
    Ok(SquadMetrics { em: em / n, f1: f1 / n })
}

/// Returns the `answer` field of the first `{ ... }` block in model output.
///
/// The block runs from the first `{` to the first `}` after it, so nested
/// objects are not supported. The block is read as JSON5, so trailing commas,
/// single quotes and bare keys are accepted. `None` when there is no block,
/// it does not parse, or it has no `answer`.
pub fn extract_answer(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let rest = &text[start..];
    let end = rest.find('}')?;
    let block: Value = json5::from_str(&rest[..=end]).ok()?;
    match block {
        Value::Object(mut map) => map.remove("answer"),
        _ => None,
    }
}

/// Flattens an extracted answer into text for scoring: strings as-is,
/// arrays by their first element, anything else empty.
pub fn answer_text(answer: Option<&Value>) -> String {
    match answer {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => answer_text(items.first()),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
