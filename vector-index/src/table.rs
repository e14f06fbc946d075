//! Tabular upload for batch indexing.
//!
//! Rows are kept as JSON objects so they can be written as point payloads
//! without further conversion.

use serde_json::{Map, Number, Value};

use crate::errors::IndexError;

/// Column embedded during batch indexing.
pub const TEXT_COLUMN: &str = "text";

/// A parsed table: ordered header plus one JSON object per row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    /// Parses CSV bytes with a header row.
    ///
    /// Cell types are inferred per cell: empty → `null`, then integer,
    /// then finite float, otherwise string.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, IndexError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Map::with_capacity(columns.len());
            for (col, cell) in columns.iter().zip(record.iter()) {
                row.insert(col.clone(), infer_cell(cell));
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Text to embed for each row of `rows`.
    ///
    /// Non-string cells are rendered as their JSON text; `null` becomes an empty string.
    pub fn texts(rows: &[Map<String, Value>]) -> Vec<String> {
        rows.iter()
            .map(|row| match row.get(TEXT_COLUMN) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
            .collect()
    }

    /// Fails with [`IndexError::MissingTextColumn`] when the `text` column is absent.
    pub fn require_text_column(&self) -> Result<(), IndexError> {
        if self.has_column(TEXT_COLUMN) {
            Ok(())
        } else {
            Err(IndexError::MissingTextColumn)
        }
    }
}

fn infer_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}
