//! Renders QA records into instruction-tuning text.
//!
//! Each example is a single-turn Llama-2 prompt followed by the gold answer
//! as a fenced JSON object and the end-of-sequence marker.

use serde::Serialize;
use serde_json::Value;

use crate::error::{DatasetError, Result};
use crate::prompt::{DEFAULT_SYSTEM_PROMPT, build_prompt};
use crate::record::QaRecord;

/// Placeholder answer used when a record has no gold answer.
pub const NO_ANSWER: &str = "?";

/// Which instruction template to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetKind {
    /// SQuAD v2: extract the minimal answer span from the context.
    Squad,
    /// CommonsenseQA: pick one of the labelled choices.
    CommonsenseQa,
}

/// How gold answers are serialized after the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerMode {
    /// JSON string of the first answer.
    First,
    /// JSON array of every answer.
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Validation,
}

impl DatasetKind {
    /// Answer mode used for `split`: SQuAD validation keeps every answer, all else the first.
    pub fn split_mode(self, split: Split) -> AnswerMode {
        match (self, split) {
            (DatasetKind::Squad, Split::Validation) => AnswerMode::All,
            _ => AnswerMode::First,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Squad => "squad_v2",
            DatasetKind::CommonsenseQa => "commonsense_qa",
        }
    }
}

/// A rendered training example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrainingExample {
    pub text: String,
}

/// Serializes the gold answers per `mode`, substituting [`NO_ANSWER`] for an empty set.
///
/// Arrays are written with `", "` between items and non-ASCII characters
/// escaped as `\uXXXX`; a single answer keeps its characters as they are.
pub fn render_answers(answers: &[String], mode: AnswerMode) -> String {
    let placeholder = [NO_ANSWER.to_string()];
    let answers = if answers.is_empty() {
        &placeholder[..]
    } else {
        answers
    };

    match mode {
        AnswerMode::First => Value::String(answers[0].clone()).to_string(),
        AnswerMode::All => {
            let items: Vec<String> = answers
                .iter()
                .map(|a| escape_non_ascii(&Value::String(a.clone()).to_string()))
                .collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

/// Instruction text (the final user message) for `record`.
pub fn instruction(kind: DatasetKind, record: &QaRecord) -> Result<String> {
    let context = record
        .context
        .as_deref()
        .ok_or_else(|| DatasetError::MissingField {
            id: record.id.clone(),
            field: "context",
        })?;

    let text = match kind {
        DatasetKind::Squad => format!(
            "Extract from the following context the minimal span word for word that best answers the question. Think step by step and explain your reasoning. Then give the answer in JSON format as follows:\n\
             ```json\n\
             {{\n  \"answer\": ...\n}}\n\
             ```\n\
             If the answer is not in the context, the answer should be \"?\".\n\
             Context: {context}\n\
             Question: {question}",
            question = record.question,
        ),
        DatasetKind::CommonsenseQa => {
            let mut choices = String::new();
            for c in record.choices.as_deref().unwrap_or_default() {
                choices.push_str(&format!(" {}. {}", c.label, c.text));
            }
            format!(
                "You are given a question, context and a set of choices. Your task is to select the correct choice that best answers the question (A, B, C, D or E). Think step by step and explain your reasoning. Then give the answer in JSON format as follows:\n\
                 ```json\n\
                 {{\n  \"answer\": ...\n}}\n\
                 ```.\n\
                 Context: {context}\n\
                 Question: {question}\n\
                 Choices:{choices}",
                question = record.question,
            )
        }
    };
    Ok(text)
}

/// Renders `record` into prompt + fenced JSON answer.
///
/// # Errors
/// [`DatasetError::MissingField`] when the record has no context.
pub fn render_example(kind: DatasetKind, record: &QaRecord, mode: AnswerMode) -> Result<TrainingExample> {
    let prompt = build_prompt(&instruction(kind, record)?, &[], DEFAULT_SYSTEM_PROMPT);
    let answers = render_answers(&record.answers, mode);
    Ok(TrainingExample {
        text: format!("{prompt} ```json\n{{\n  \"answer\": {answers}\n}}\n``` </s>"),
    })
}
