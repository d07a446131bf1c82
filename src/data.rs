use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single auto-typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Type a raw text field: trimmed, empty means missing, anything `f64`
    /// accepts becomes a number, the rest stays text.
    pub fn auto_type(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Missing;
        }
        match s.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(s.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// One data row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    /// Absent keys read as `Missing`.
    pub fn get(&self, column: &str) -> &Value {
        self.fields.get(column).unwrap_or(&Value::Missing)
    }
}

/// The loaded dataset: distinct columns in header order plus one record per row.
#[derive(Debug, Clone)]
pub struct PlotData {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl PlotData {
    pub fn new(columns: Vec<String>, records: Vec<RawRecord>) -> Self {
        Self { columns: dedup_columns(columns), records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a file, choosing the parser from its extension (`.json` or delimited text).
    pub fn from_path(path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            let value: JsonValue = serde_json::from_reader(file)
                .with_context(|| format!("Failed to parse JSON in '{}'", path.display()))?;
            Self::from_json(&value)
        } else {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            Self::from_csv_reader(file, delimiter_for(path))
                .with_context(|| format!("Failed to read CSV from '{}'", path.display()))
        }
    }

    /// Parse delimited text with a header row. Short rows are padded with `Missing`.
    pub fn from_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row = result.with_context(|| format!("Failed to parse CSV row {}", idx + 1))?;
            let mut record = RawRecord::new();
            for (col_idx, header) in headers.iter().enumerate() {
                let value = row.get(col_idx).map(Value::auto_type).unwrap_or(Value::Missing);
                record.insert(header.clone(), value);
            }
            records.push(record);
        }

        Ok(Self::new(headers, records))
    }

    /// Create PlotData from a JSON array of objects. Columns follow first-seen key order.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let mut columns = Vec::new();
        let mut records = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut record = RawRecord::new();
            for (key, field) in obj {
                let value = match field {
                    JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Missing),
                    JsonValue::String(s) => Value::auto_type(s),
                    JsonValue::Bool(b) => Value::Text(b.to_string()),
                    JsonValue::Null => Value::Missing,
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", key)),
                };
                columns.push(key.clone());
                record.insert(key.clone(), value);
            }
            records.push(record);
        }

        Ok(Self::new(columns, records))
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn dedup_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    columns.into_iter().filter(|c| seen.insert(c.clone())).collect()
}
