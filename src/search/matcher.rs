use crate::data::record::FieldValue;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Strategy deciding whether a field value matches a search term.
///
/// One matcher governs every active filter of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMatcher {
    /// String-normalized equality
    Exact,
    /// Case-insensitive substring containment
    #[default]
    Partial,
    /// Case-insensitive equality
    CaseInsensitive,
    /// Case-insensitive regular expression; an invalid pattern matches nothing
    Pattern,
}

impl SearchMatcher {
    pub const ALL: [SearchMatcher; 4] = [
        SearchMatcher::Exact,
        SearchMatcher::Partial,
        SearchMatcher::CaseInsensitive,
        SearchMatcher::Pattern,
    ];

    pub fn matches(&self, value: &FieldValue, term: &str) -> bool {
        self.prepare(term).matches(value)
    }

    /// Pre-process `term` once so it can be tested against many values
    pub fn prepare(&self, term: &str) -> PreparedTerm {
        match self {
            SearchMatcher::Exact => PreparedTerm::Exact(term.to_string()),
            SearchMatcher::Partial => PreparedTerm::Contains(term.to_lowercase()),
            SearchMatcher::CaseInsensitive => PreparedTerm::EqualsIgnoreCase(term.to_lowercase()),
            SearchMatcher::Pattern => match RegexBuilder::new(term).case_insensitive(true).build() {
                Ok(regex) => PreparedTerm::Pattern(regex),
                Err(e) => {
                    debug!(target: "search", "Invalid pattern '{}': {}", term, e);
                    PreparedTerm::Never
                }
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchMatcher::Exact => "exact",
            SearchMatcher::Partial => "partial",
            SearchMatcher::CaseInsensitive => "case_insensitive",
            SearchMatcher::Pattern => "pattern",
        }
    }
}

impl fmt::Display for SearchMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMatcher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(SearchMatcher::Exact),
            "partial" | "contains" => Ok(SearchMatcher::Partial),
            "case_insensitive" | "caseinsensitive" | "ci" => Ok(SearchMatcher::CaseInsensitive),
            "pattern" | "regex" => Ok(SearchMatcher::Pattern),
            other => Err(anyhow::anyhow!("Unknown matcher '{}'", other)),
        }
    }
}

/// A search term compiled for one matcher
#[derive(Debug, Clone)]
pub enum PreparedTerm {
    Exact(String),
    Contains(String),
    EqualsIgnoreCase(String),
    Pattern(Regex),
    Never,
}

impl PreparedTerm {
    pub fn matches(&self, value: &FieldValue) -> bool {
        let text = value.to_string();
        match self {
            PreparedTerm::Exact(term) => text == *term,
            PreparedTerm::Contains(term) => text.to_lowercase().contains(term.as_str()),
            PreparedTerm::EqualsIgnoreCase(term) => text.to_lowercase() == *term,
            PreparedTerm::Pattern(regex) => regex.is_match(&text),
            PreparedTerm::Never => false,
        }
    }
}
