//! JSONL helpers for dataset splits and prediction files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{DatasetError, Result};

/// Reads one JSON value per line, skipping blank lines.
///
/// # Errors
/// [`DatasetError::Json`] names the 1-based line that failed.
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    info!("Reading JSONL: {:?}", path);

    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        out.push(row);
    }

    debug!(rows = out.len(), "JSONL loaded");
    Ok(out)
}

/// Writes `rows` as JSONL, replacing the file.
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    for (i, row) in rows.iter().enumerate() {
        serde_json::to_writer(&mut w, row).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        w.write_all(b"\n").map_err(io_err)?;
    }
    w.flush().map_err(io_err)?;

    info!(rows = rows.len(), "Wrote JSONL: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn rows_survive_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        let rows = vec![json!({"id": "1", "text": "a\nb"}), json!({"id": "2"})];

        write_jsonl(&path, &rows).unwrap();
        let back: Vec<Value> = read_jsonl(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn bad_line_is_reported_with_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"id\": 1}\n\n{oops}\n").unwrap();

        let err = read_jsonl::<Value>(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Json { line: 3, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_jsonl::<Value>("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
