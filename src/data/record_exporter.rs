use crate::data::record::{FieldValue, Record};
use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Sorted union of the field names used by `records`
pub fn collect_headers(records: &[Record]) -> Vec<String> {
    let headers: BTreeSet<&String> = records.iter().flat_map(|r| r.field_names()).collect();
    headers.into_iter().cloned().collect()
}

pub fn export_csv<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let headers = collect_headers(records);
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(&headers)?;
    for record in records {
        csv_writer.write_record(headers.iter().map(|h| record.value(h).to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_json<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let array: Vec<JsonValue> = records
        .iter()
        .map(|record| {
            let object = record
                .fields()
                .map(|(field, value)| (field.clone(), field_to_json(value)))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    serde_json::to_writer_pretty(writer, &array)?;
    Ok(())
}

/// Write `records` to `path`, choosing CSV or JSON by extension
pub fn export_to_file<P: AsRef<Path>>(records: &[Record], path: P) -> Result<String> {
    let path = path.as_ref();
    if records.is_empty() {
        return Err(anyhow!("No data to export"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let format = match extension.as_deref() {
        Some("json") => "JSON",
        Some("csv") => "CSV",
        _ => return Err(anyhow!("Unsupported export type: {:?}", path)),
    };

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    if format == "JSON" {
        export_json(records, &mut writer)?;
    } else {
        export_csv(records, &mut writer)?;
    }
    writer.flush()?;

    info!(target: "exporter", "Exported {} records to {:?}", records.len(), path);
    Ok(format!(
        "Exported {} records to {} file: {}",
        records.len(),
        format,
        path.display()
    ))
}

fn field_to_json(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::Null => JsonValue::Null,
        FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => JsonValue::from(*n as i64),
        FieldValue::Number(n) => JsonValue::from(*n),
        FieldValue::Text(s) => JsonValue::String(s.clone()),
        FieldValue::Date(dt) => JsonValue::String(dt.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record_loader::{load_records, records_from_csv};
    use crate::record;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Record> {
        vec![
            record! { "id" => 2, "name" => "Alice, Inc" },
            record! { "id" => 1, "name" => "Bob", "city" => "Oslo" },
        ]
    }

    #[test]
    fn test_csv_uses_header_union_and_quotes() {
        let mut out = Vec::new();
        export_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "city,id,name");
        assert_eq!(lines[1], ",2,\"Alice, Inc\"");
        assert_eq!(lines[2], "Oslo,1,Bob");

        let back = records_from_csv(text.as_bytes()).unwrap();
        assert_eq!(back[0].value("name"), &FieldValue::from("Alice, Inc"));
    }

    #[test]
    fn test_json_keeps_integers_integral() {
        let mut out = Vec::new();
        export_json(&sample(), &mut out).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed[0]["id"], JsonValue::from(2));
        assert_eq!(parsed[1]["city"], JsonValue::from("Oslo"));
        assert!(parsed[0].get("city").is_none());
    }

    #[test]
    fn test_dates_export_as_rfc3339() {
        let since = Utc.with_ymd_and_hms(2020, 1, 31, 12, 0, 0).unwrap();
        let records = vec![record! { "id" => 1, "since" => since }];

        let mut json_out = Vec::new();
        export_json(&records, &mut json_out).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&json_out).unwrap();
        assert_eq!(parsed[0]["since"], JsonValue::from("2020-01-31T12:00:00+00:00"));

        let mut csv_out = Vec::new();
        export_csv(&records, &mut csv_out).unwrap();
        let text = String::from_utf8(csv_out).unwrap();
        assert_eq!(text.lines().nth(1), Some("1,2020-01-31T12:00:00+00:00"));
    }

    #[test]
    fn test_export_to_file_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");

        let message = export_to_file(&sample(), &path).unwrap();
        assert!(message.contains("2 records"));
        assert_eq!(load_records(&path).unwrap(), sample());
    }

    #[test]
    fn test_export_rejects_empty_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_to_file(&[], dir.path().join("x.csv")).is_err());
        assert!(export_to_file(&sample(), dir.path().join("x.xml")).is_err());
    }
}
