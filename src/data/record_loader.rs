use crate::data::record::{FieldValue, Record};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Load records from a `.json` or `.csv` file, chosen by extension
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("json") => load_json_records(path),
        Some("csv") => load_csv_records(path),
        _ => Err(anyhow!("Unsupported file type: {:?}", path)),
    }
}

/// Load a JSON array of flat objects
pub fn load_json_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let json: JsonValue = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON file: {:?}", path.as_ref()))?;

    let records = records_from_json(&json)?;
    info!(target: "loader", "Loaded {} records from {:?}", records.len(), path.as_ref());
    Ok(records)
}

/// Load a CSV file with a header row
pub fn load_csv_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    let records = records_from_csv(file)?;
    info!(target: "loader", "Loaded {} records from {:?}", records.len(), path.as_ref());
    Ok(records)
}

pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let row_data = result.with_context(|| format!("Malformed CSV row {}", row + 1))?;
        let record: Record = headers
            .iter()
            .zip(row_data.iter())
            .map(|(header, cell)| (header.to_string(), FieldValue::infer_from_str(cell)))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Convert a JSON array of objects; nested values are kept as JSON text
pub fn records_from_json(json: &JsonValue) -> Result<Vec<Record>> {
    let items = json
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of records"))?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| anyhow!("Record {} is not a JSON object", index))?;
        let record: Record = object
            .iter()
            .map(|(key, value)| (key.clone(), json_to_field(value)))
            .collect();
        records.push(record);
    }

    debug!(target: "loader", "Converted {} JSON objects", records.len());
    Ok(records)
}

fn json_to_field(value: &JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Text(b.to_string()),
        JsonValue::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        JsonValue::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}
