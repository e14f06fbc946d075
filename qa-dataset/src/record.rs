//! Question-answering records and the raw dataset row shapes they come from.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DatasetError, Result};

/// One labelled choice of a multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

/// A single question with its gold answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QaRecord {
    pub id: String,
    pub context: Option<String>,
    pub question: String,
    /// Gold answers in dataset order; may be empty (unanswerable).
    pub answers: Vec<String>,
    pub choices: Option<Vec<Choice>>,
}

/// SQuAD v2 row: `{id, title?, context, question, answers: {text, answer_start}}`.
#[derive(Deserialize)]
struct SquadRow {
    id: String,
    context: String,
    question: String,
    answers: SquadAnswers,
}

#[derive(Deserialize)]
struct SquadAnswers {
    text: Vec<String>,
}

/// CommonsenseQA row: `{id, question, question_concept?, choices: {label, text}, answerKey}`.
#[derive(Deserialize)]
struct CommonsenseRow {
    id: String,
    question: String,
    choices: CommonsenseChoices,
    #[serde(rename = "answerKey", default)]
    answer_key: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Deserialize)]
struct CommonsenseChoices {
    label: Vec<String>,
    text: Vec<String>,
}

impl QaRecord {
    pub fn from_squad_row(row: &Map<String, Value>) -> Result<Self> {
        let r: SquadRow = serde_json::from_value(Value::Object(row.clone()))
            .map_err(|source| DatasetError::Row {
                kind: "squad",
                source,
            })?;

        Ok(Self {
            id: r.id,
            context: Some(r.context),
            question: r.question,
            answers: r.answers.text,
            choices: None,
        })
    }

    /// An empty `answerKey` yields an empty answer set.
    pub fn from_commonsense_row(row: &Map<String, Value>) -> Result<Self> {
        let r: CommonsenseRow = serde_json::from_value(Value::Object(row.clone()))
            .map_err(|source| DatasetError::Row {
                kind: "commonsense_qa",
                source,
            })?;

        let choices = r
            .choices
            .label
            .into_iter()
            .zip(r.choices.text)
            .map(|(label, text)| Choice { label, text })
            .collect();

        let answers = if r.answer_key.is_empty() {
            Vec::new()
        } else {
            vec![r.answer_key]
        };

        Ok(Self {
            id: r.id,
            context: r.context,
            question: r.question,
            answers,
            choices: Some(choices),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test rows are objects"),
        }
    }

    #[test]
    fn squad_row_keeps_answer_order() {
        let row = obj(json!({
            "id": "56be",
            "title": "Beyonce",
            "context": "Beyonce was born in 1981.",
            "question": "When was Beyonce born?",
            "answers": {"text": ["1981", "in 1981"], "answer_start": [20, 17]}
        }));
        let r = QaRecord::from_squad_row(&row).unwrap();
        assert_eq!(r.id, "56be");
        assert_eq!(r.context.as_deref(), Some("Beyonce was born in 1981."));
        assert_eq!(r.answers, vec!["1981", "in 1981"]);
        assert!(r.choices.is_none());
    }

    #[test]
    fn commonsense_row_zips_choices() {
        let row = obj(json!({
            "id": "q1",
            "question": "Where do you keep milk?",
            "question_concept": "milk",
            "choices": {"label": ["A", "B"], "text": ["fridge", "oven"]},
            "answerKey": "A"
        }));
        let r = QaRecord::from_commonsense_row(&row).unwrap();
        assert_eq!(r.answers, vec!["A"]);
        assert_eq!(r.context, None);
        assert_eq!(
            r.choices.unwrap(),
            vec![
                Choice { label: "A".into(), text: "fridge".into() },
                Choice { label: "B".into(), text: "oven".into() },
            ]
        );
    }

    #[test]
    fn empty_answer_key_means_no_answers() {
        let row = obj(json!({
            "id": "q2",
            "question": "?",
            "choices": {"label": [], "text": []},
            "answerKey": ""
        }));
        assert!(QaRecord::from_commonsense_row(&row).unwrap().answers.is_empty());
    }

    #[test]
    fn malformed_row_is_a_row_error() {
        let row = obj(json!({"id": "x", "question": "q"}));
        assert!(matches!(
            QaRecord::from_squad_row(&row),
            Err(DatasetError::Row { kind: "squad", .. })
        ));
    }
}
