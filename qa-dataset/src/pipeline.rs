//! Split-level preparation: raw rows in, rows with a `text` column out.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::context::{ContextLookup, join_context};
use crate::error::Result;
use crate::metrics::{SquadMetrics, answer_text, compute_squad_metrics_multi, extract_answer};
use crate::record::QaRecord;
use crate::transform::{DatasetKind, Split, render_example};

/// Renders every row of one split.
///
/// Output rows are the input rows plus `text` and, when `contexts` is
/// given, the joined `context`.
pub fn prepare_split(
    kind: DatasetKind,
    split: Split,
    rows: Vec<Map<String, Value>>,
    contexts: Option<&ContextLookup>,
) -> Result<Vec<Map<String, Value>>> {
    let mode = kind.split_mode(split);
    info!(dataset = kind.name(), ?split, ?mode, rows = rows.len(), "Preparing split");

    let mut records = rows
        .iter()
        .map(|row| match kind {
            DatasetKind::Squad => QaRecord::from_squad_row(row),
            DatasetKind::CommonsenseQa => QaRecord::from_commonsense_row(row),
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(lookup) = contexts {
        records = join_context(records, lookup)?;
    }

    let mut out = Vec::with_capacity(rows.len());
    for (mut row, record) in rows.into_iter().zip(&records) {
        let example = render_example(kind, record, mode)?;
        if contexts.is_some() {
            if let Some(ctx) = &record.context {
                row.insert("context".into(), Value::String(ctx.clone()));
            }
        }
        row.insert("text".into(), Value::String(example.text));
        out.push(row);
    }

    debug!(rows = out.len(), "Split prepared");
    Ok(out)
}

/// Prediction line for evaluation: raw model `output` plus gold `answers`.
#[derive(Debug, Deserialize)]
pub struct PredictionRow {
    pub output: String,
    #[serde(deserialize_with = "one_or_many")]
    pub answers: Vec<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Extracts each prediction's answer and scores it against its best gold answer.
///
/// An empty gold list stands for an unanswerable question whose gold answer is `"?"`.
pub fn evaluate_predictions(rows: &[PredictionRow]) -> Result<SquadMetrics> {
    let predictions: Vec<String> = rows
        .iter()
        .map(|r| answer_text(extract_answer(&r.output).as_ref()))
        .collect();
    let golds: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            if r.answers.is_empty() {
                vec![crate::transform::NO_ANSWER.to_string()]
            } else {
                r.answers.clone()
            }
        })
        .collect();

    compute_squad_metrics_multi(&predictions, &golds)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::error::DatasetError;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test rows are objects"),
        }
    }

    #[test]
    fn squad_validation_rows_keep_columns_and_get_all_answers() {
        let rows = vec![obj(json!({
            "id": "1",
            "context": "Paris is in France.",
            "question": "Where is Paris?",
            "answers": {"text": ["France", "in France"], "answer_start": [12, 9]}
        }))];

        let out = prepare_split(DatasetKind::Squad, Split::Validation, rows, None).unwrap();
        assert_eq!(out[0]["id"], "1");
        assert!(out[0]["answers"].is_object());
        let text = out[0]["text"].as_str().unwrap();
        assert!(text.ends_with("\"answer\": [\"France\", \"in France\"]\n}\n``` </s>"));
    }

    #[test]
    fn commonsense_rows_get_joined_context() {
        let rows = vec![obj(json!({
            "id": "q1",
            "question": "Where is milk kept?",
            "choices": {"label": ["A", "B"], "text": ["fridge", "oven"]},
            "answerKey": "A"
        }))];
        let lookup = ContextLookup::from_map(HashMap::from([("q1".to_string(), "Cold keeps milk.".to_string())]));

        let out = prepare_split(DatasetKind::CommonsenseQa, Split::Train, rows, Some(&lookup)).unwrap();
        assert_eq!(out[0]["context"], "Cold keeps milk.");
        assert!(out[0]["text"].as_str().unwrap().contains("Context: Cold keeps milk.\n"));
    }

    #[test]
    fn commonsense_without_contexts_fails() {
        let rows = vec![obj(json!({
            "id": "q1",
            "question": "?",
            "choices": {"label": ["A"], "text": ["x"]},
            "answerKey": "A"
        }))];
        let err = prepare_split(DatasetKind::CommonsenseQa, Split::Train, rows, None).unwrap_err();
        assert!(matches!(err, DatasetError::MissingField { field: "context", .. }));
    }

    #[test]
    fn predictions_are_scored_against_best_gold() {
        let rows: Vec<PredictionRow> = serde_json::from_value(json!([
            {"output": "Reasoning... ```json\n{\"answer\": \"Denver Broncos\"}\n```", "answers": ["Broncos", "Denver Broncos"]},
            {"output": "{\"answer\": \"?\"}", "answers": []},
            {"output": "I am not sure.", "answers": "Paris"}
        ]))
        .unwrap();

        let m = evaluate_predictions(&rows).unwrap();
        assert!((m.em - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-9);
    }
}
