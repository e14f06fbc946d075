//! `qa-prep`: build instruction-tuning splits and score model predictions.
//!
//! ```bash
//! qa-prep squad --train train.jsonl --validation dev.jsonl --out data/squad_v2
//! qa-prep commonsense --train train.jsonl --validation dev.jsonl \
//!     --train-context train.json --validation-context valid.json --out data/commonsense_qa
//! qa-prep evaluate --predictions preds.jsonl
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use qa_dataset::io::{read_jsonl, write_jsonl};
use qa_dataset::pipeline::{PredictionRow, evaluate_predictions, prepare_split};
use qa_dataset::{ContextLookup, DatasetError, DatasetKind, Split};
use serde_json::{Map, Value};
use tracing::{Level, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about = "QA instruction-data toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render SQuAD v2 train/validation JSONL into `train.jsonl` / `test.jsonl`.
    Squad {
        #[arg(long, value_name = "JSONL")]
        train: PathBuf,
        #[arg(long, value_name = "JSONL")]
        validation: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Render CommonsenseQA with contexts joined from `{id: context}` JSON files.
    Commonsense {
        #[arg(long, value_name = "JSONL")]
        train: PathBuf,
        #[arg(long, value_name = "JSONL")]
        validation: PathBuf,
        #[arg(long, value_name = "JSON")]
        train_context: PathBuf,
        #[arg(long, value_name = "JSON")]
        validation_context: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Score `{output, answers}` prediction lines with SQuAD EM/F1.
    Evaluate {
        #[arg(long, value_name = "JSONL")]
        predictions: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(embed_service::telemetry::env_filter_with_level(
            "info",
            &["qa_dataset", "qa_prep"],
            Level::INFO,
        ))
        .with(embed_service::telemetry::layer())
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "qa-prep failed");
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), DatasetError> {
    match command {
        Command::Squad {
            train,
            validation,
            out,
        } => {
            let kind = DatasetKind::Squad;
            write_split(kind, Split::Train, &train, None, &out.join("train.jsonl"))?;
            write_split(kind, Split::Validation, &validation, None, &out.join("test.jsonl"))
        }
        Command::Commonsense {
            train,
            validation,
            train_context,
            validation_context,
            out,
        } => {
            let kind = DatasetKind::CommonsenseQa;
            let train_ctx = ContextLookup::from_path(&train_context)?;
            let valid_ctx = ContextLookup::from_path(&validation_context)?;
            write_split(kind, Split::Train, &train, Some(&train_ctx), &out.join("train.jsonl"))?;
            write_split(
                kind,
                Split::Validation,
                &validation,
                Some(&valid_ctx),
                &out.join("test.jsonl"),
            )
        }
        Command::Evaluate { predictions } => {
            let rows: Vec<PredictionRow> = read_jsonl(&predictions)?;
            let metrics = evaluate_predictions(&rows)?;
            info!(rows = rows.len(), em = metrics.em, f1 = metrics.f1, "Evaluation done");
            // Metrics go to stdout as JSON so they can be piped.
            println!(
                "{}",
                serde_json::json!({"EM": metrics.em, "F1": metrics.f1})
            );
            Ok(())
        }
    }
}

fn write_split(
    kind: DatasetKind,
    split: Split,
    input: &Path,
    contexts: Option<&ContextLookup>,
    output: &Path,
) -> Result<(), DatasetError> {
    let rows: Vec<Map<String, Value>> = read_jsonl(input)?;
    let prepared = prepare_split(kind, split, rows, contexts)?;

    if let Some(first) = prepared.first().and_then(|r| r.get("text")).and_then(Value::as_str) {
        println!("{}", format!("--- {} {:?}: first example ---", kind.name(), split).cyan().bold());
        println!("{first}");
    }

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    write_jsonl(output, &prepared)?;
    println!(
        "{} {} rows -> {}",
        "✔".green(),
        prepared.len(),
        output.display()
    );
    Ok(())
}
