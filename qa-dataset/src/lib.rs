//! Instruction-tuning data preparation for extractive and multiple-choice QA.
//!
//! - [`prompt`]: Llama-2 chat prompt layout and the default system prompt.
//! - [`record`]: QA records parsed from SQuAD v2 / CommonsenseQA rows.
//! - [`transform`]: prompt + gold-answer rendering per dataset.
//! - [`context`]: joining external per-id contexts.
//! - [`metrics`]: SQuAD exact-match / F1 and answer extraction.
//! - [`pipeline`]: split-level preparation and prediction scoring.
//! - [`io`]: JSONL reading and writing.

pub mod context;
pub mod error;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod transform;

pub use context::{ContextLookup, join_context};
pub use error::{DatasetError, Result};
pub use metrics::{
    SquadMetrics, compute_squad_metrics, exact_match_score, extract_answer, f1_score,
    metric_max_over_ground_truths, normalize_answer,
};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, build_prompt};
pub use record::{Choice, QaRecord};
pub use transform::{AnswerMode, DatasetKind, Split, TrainingExample, render_example};
