use crate::data::record::{FieldValue, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The single active sort of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Selecting the sorted field toggles direction, a new field starts ascending
    pub fn select(current: Option<&SortSpec>, field: &str) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec {
                field: spec.field.clone(),
                direction: spec.direction.toggled(),
            },
            _ => SortSpec::ascending(field),
        }
    }
}

/// Total-order strategy used to sort records on one field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSorter {
    #[default]
    Alphabetic,
    Numeric,
    Chronological,
}

impl RecordSorter {
    pub const ALL: [RecordSorter; 3] = [
        RecordSorter::Alphabetic,
        RecordSorter::Numeric,
        RecordSorter::Chronological,
    ];

    /// Return an ordered copy of `records`; equal keys keep their input order
    pub fn sort(&self, records: &[Record], field: &str, direction: SortDirection) -> Vec<Record> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| direction.apply(self.compare(a.value(field), b.value(field))));
        sorted
    }

    pub fn compare(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        match self {
            RecordSorter::Alphabetic => alphabetic_cmp(&a.to_string(), &b.to_string()),
            RecordSorter::Numeric => numeric_key(a)
                .partial_cmp(&numeric_key(b))
                .unwrap_or(Ordering::Equal),
            RecordSorter::Chronological => timestamp_key(a).cmp(&timestamp_key(b)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordSorter::Alphabetic => "alphabetic",
            RecordSorter::Numeric => "numeric",
            RecordSorter::Chronological => "chronological",
        }
    }
}

impl fmt::Display for RecordSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordSorter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alphabetic" | "alpha" | "text" => Ok(RecordSorter::Alphabetic),
            "numeric" | "number" => Ok(RecordSorter::Numeric),
            "chronological" | "date" | "time" => Ok(RecordSorter::Chronological),
            other => Err(anyhow::anyhow!("Unknown sorter '{}'", other)),
        }
    }
}

/// Case- and accent-insensitive text order; ties fall back to the lowercased
/// text so "emile" sorts before "émile".
///
/// Folding covers Latin-1 and Latin Extended-A letters only. Other scripts
/// compare by code point, which is not full locale collation.
pub fn alphabetic_cmp(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    a_lower
        .chars()
        .map(fold_diacritic)
        .cmp(b_lower.chars().map(fold_diacritic))
        .then_with(|| a_lower.cmp(&b_lower))
}

/// Base letter of a lowercase accented Latin letter
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

const NUMERIC_CHARS: &str = "0123456789+-.eE";

/// Numeric coercion: unparsable or absent values count as 0
pub fn numeric_key(value: &FieldValue) -> f64 {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            // `f64::from_str` also takes "inf" and "nan"; those are not numbers here
            if trimmed.is_empty() || !trimmed.chars().all(|c| NUMERIC_CHARS.contains(c)) {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        FieldValue::Date(dt) => dt.timestamp_millis() as f64,
        FieldValue::Null => 0.0,
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Timestamp coercion in epoch milliseconds: unparsable or absent values count as 0
pub fn timestamp_key(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Date(dt) => dt.timestamp_millis(),
        FieldValue::Number(n) if n.is_finite() => *n as i64,
        FieldValue::Text(s) => parse_timestamp(s).map(|dt| dt.timestamp_millis()).unwrap_or(0),
        _ => 0,
    }
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
