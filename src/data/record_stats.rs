use crate::data::record::{FieldValue, Record};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Minimum and maximum digit counts accepted for a phone number
const PHONE_DIGITS: (usize, usize) = (8, 15);

/// Summary of a record sequence, typically the store or the derived view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStats {
    pub total: usize,
    /// Non-empty value count per field seen in any record
    pub filled: BTreeMap<String, usize>,
    /// Occurrences of each value of the group field, if one was requested
    pub groups: BTreeMap<String, usize>,
}

impl RecordStats {
    pub fn compute(records: &[Record], group_field: Option<&str>) -> Self {
        let mut stats = RecordStats {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            for (field, value) in record.fields() {
                let entry = stats.filled.entry(field.clone()).or_insert(0);
                if !is_blank(value) {
                    *entry += 1;
                }
            }

            if let Some(group) = group_field {
                let key = record.value(group).to_string();
                *stats.groups.entry(key).or_insert(0) += 1;
            }
        }

        stats
    }

    pub fn filled_count(&self, field: &str) -> usize {
        self.filled.get(field).copied().unwrap_or(0)
    }

    /// Records lacking a non-empty `field`
    pub fn missing_count(&self, field: &str) -> usize {
        self.total - self.filled_count(field)
    }
}

fn is_blank(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

/// Strip formatting from a phone number, keeping digits and a leading `+`
pub fn normalize_phone(value: &str) -> String {
    let trimmed = value.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if trimmed.starts_with('+') {
        format!("+{}", digits)
    } else {
        digits
    }
}

pub fn is_valid_phone(value: &str) -> bool {
    let has_letters = value.chars().any(|c| c.is_alphabetic());
    let digits = normalize_phone(value).trim_start_matches('+').len();
    !has_letters && digits >= PHONE_DIGITS.0 && digits <= PHONE_DIGITS.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_compute_counts_filled_and_groups() {
        let records = vec![
            record! { "id" => 1, "category" => "A", "email" => "a@x.io" },
            record! { "id" => 2, "category" => "B", "email" => "  " },
            record! { "id" => 3, "category" => "A" },
        ];

        let stats = RecordStats::compute(&records, Some("category"));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.filled_count("email"), 1);
        assert_eq!(stats.missing_count("email"), 2);
        assert_eq!(stats.filled_count("id"), 3);
        assert_eq!(stats.groups.get("A"), Some(&2));
        assert_eq!(stats.groups.get("B"), Some(&1));
    }

    #[test]
    fn test_missing_group_field_groups_under_empty_key() {
        let records = vec![record! { "id" => 1 }];
        let stats = RecordStats::compute(&records, Some("region"));
        assert_eq!(stats.groups.get(""), Some(&1));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("sales@acme.example"));
        assert!(is_valid_email(" ops@globex.co.uk "));
        assert!(!is_valid_email("no-at-sign.example"));
        assert!(!is_valid_email("two words@acme.example"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn test_phone_normalization_and_validation() {
        assert_eq!(normalize_phone("+33 (1) 23-45-67-89"), "+33123456789");
        assert_eq!(normalize_phone("555 0100"), "5550100");

        assert!(is_valid_phone("+33 1 23 45 67 89"));
        assert!(!is_valid_phone("555 0100"));
        assert!(!is_valid_phone("call me maybe 12345678"));
    }
}
